//! Seams between the clustering engine and its collaborators.

pub mod cancellation;
pub mod sequence_matcher;

pub use cancellation::{Cancellable, CancellationToken};
pub use sequence_matcher::SequenceMatcher;
