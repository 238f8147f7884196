//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for occurrence sets (a common substring usually spans <4 sources).
pub type SmallVec4<T> = SmallVec<[T; 4]>;
