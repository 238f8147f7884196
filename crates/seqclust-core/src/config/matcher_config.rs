//! Sequence matcher configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the built-in common-substring matcher.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MatcherConfig {
    /// Shortest run, in tokens, reported as a common substring. Default: 1.
    pub min_length: Option<usize>,
}

impl MatcherConfig {
    /// Returns the effective minimum match length, defaulting to 1.
    pub fn effective_min_length(&self) -> usize {
        self.min_length.unwrap_or(1)
    }
}
