//! Clustering errors.
//!
//! Any of these aborts the run. `merges_completed` reports how far the run
//! got, but the partial hierarchy is dropped.

use super::error_code::{self, SeqclustErrorCode};

/// Errors that can occur while building the cluster hierarchy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClusteringError {
    #[error("No input sequences to cluster")]
    EmptyInput,

    #[error(
        "No common substring among the {live_clusters} live clusters \
         (after {merges_completed} merges); distances cannot be normalized"
    )]
    NoGlobalMatch {
        live_clusters: usize,
        merges_completed: usize,
    },

    #[error(
        "Clustering stalled: no pair of the {live_clusters} live clusters shares a substring \
         (after {merges_completed} merges)"
    )]
    Stalled {
        live_clusters: usize,
        merges_completed: usize,
    },

    #[error("Iteration limit of {limit} merges reached before a single root remained")]
    IterationLimitExceeded { limit: usize },

    #[error("Clustering deadline exceeded: {elapsed_ms}ms elapsed, limit {limit_ms}ms")]
    DeadlineExceeded { elapsed_ms: u64, limit_ms: u64 },

    #[error("Clustering cancelled after {merges_completed} merges")]
    Cancelled { merges_completed: usize },
}

impl SeqclustErrorCode for ClusteringError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => error_code::EMPTY_INPUT,
            Self::NoGlobalMatch { .. } => error_code::NO_GLOBAL_MATCH,
            Self::Stalled { .. } => error_code::CLUSTERING_STALLED,
            Self::IterationLimitExceeded { .. } => error_code::ITERATION_LIMIT,
            Self::DeadlineExceeded { .. } => error_code::DEADLINE_EXCEEDED,
            Self::Cancelled { .. } => error_code::CANCELLED,
        }
    }
}

impl ClusteringError {
    /// Stamp the number of merges completed so far onto progress-carrying variants.
    pub fn with_merges_completed(self, merges: usize) -> Self {
        match self {
            Self::NoGlobalMatch { live_clusters, .. } => Self::NoGlobalMatch {
                live_clusters,
                merges_completed: merges,
            },
            Self::Stalled { live_clusters, .. } => Self::Stalled {
                live_clusters,
                merges_completed: merges,
            },
            Self::Cancelled { .. } => Self::Cancelled {
                merges_completed: merges,
            },
            other => other,
        }
    }
}
