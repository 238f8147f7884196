//! Clustering loop configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::LinkPolicy;

/// Configuration for the agglomerative clustering loop.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClusteringConfig {
    /// How hierarchy nodes find their predecessors. Default: identity.
    pub link_policy: Option<LinkPolicy>,
    /// Run the pairwise matcher queries of one iteration on the rayon pool. Default: true.
    pub parallel: Option<bool>,
    /// Maximum number of merges before the run is aborted. Default: unbounded.
    pub max_iterations: Option<usize>,
    /// Wall-clock budget for a whole run, in milliseconds. Default: unbounded.
    pub timeout_ms: Option<u64>,
}

impl ClusteringConfig {
    /// Returns the effective link policy, defaulting to `Identity`.
    pub fn effective_link_policy(&self) -> LinkPolicy {
        self.link_policy.unwrap_or_default()
    }

    /// Returns whether pairwise queries run in parallel, defaulting to true.
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    /// Returns the run deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
