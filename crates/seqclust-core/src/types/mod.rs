//! Data model for seqclust.
//! Interned tokens, shared sequences, clusters, and matcher results.

pub mod cluster;
pub mod collections;
pub mod identifiers;
pub mod interning;
pub mod sequence;
pub mod substring;

pub use cluster::{Cluster, Representative};
pub use collections::{FxHashMap, FxHashSet, SmallVec4};
pub use identifiers::{ClusterId, LinkPolicy, Token};
pub use interning::TokenInterner;
pub use sequence::Sequence;
pub use substring::CommonSubstring;
