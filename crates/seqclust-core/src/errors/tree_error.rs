//! Errors rebuilding a merge tree from its flat form.

use super::error_code::{self, SeqclustErrorCode};

/// A flat node list that does not describe exactly one merge tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClusterTreeError {
    #[error("Cluster tree has no nodes")]
    Empty,

    #[error("Cluster id {id} appears more than once")]
    DuplicateId { id: u32 },

    #[error("Cluster {id} merges {constituent}, which is not an earlier unclaimed node")]
    MissingConstituent { id: u32, constituent: u32 },

    #[error("Cluster {id} carries a sequence that matches neither constituent")]
    ForeignRepresentative { id: u32 },

    #[error("Cluster tree has {roots} roots, expected 1")]
    MultipleRoots { roots: usize },
}

impl SeqclustErrorCode for ClusterTreeError {
    fn error_code(&self) -> &'static str {
        error_code::MALFORMED_TREE
    }
}
