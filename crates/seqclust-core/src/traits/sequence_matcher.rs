use crate::types::{CommonSubstring, Token};

/// Common-substring enumerator consumed by the distance engine.
///
/// Implementations must be deterministic: the same sources in the same order
/// yield the same results in the same order.
pub trait SequenceMatcher: Send + Sync {
    /// Find the common substrings among `sources`, keyed by caller-chosen
    /// source indices.
    ///
    /// Results are ordered by descending `length`. An empty vector means no
    /// substring is shared by two or more sources.
    fn common_substrings(&self, sources: &[(usize, &[Token])]) -> Vec<CommonSubstring>;

    /// Human-readable matcher name, used in logs.
    fn name(&self) -> &str;
}
