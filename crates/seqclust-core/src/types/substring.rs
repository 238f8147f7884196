//! Result type returned by sequence matchers.

use serde::{Deserialize, Serialize};

use super::collections::SmallVec4;
use super::identifiers::Token;

/// One common substring found across the supplied sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonSubstring {
    /// The matched tokens.
    pub tokens: Vec<Token>,
    /// Match length in tokens. Always equals `tokens.len()`.
    pub length: usize,
    /// Source indices the substring occurs in, ascending, at least two.
    pub occurrences: SmallVec4<usize>,
}

impl CommonSubstring {
    pub fn new(tokens: Vec<Token>, occurrences: SmallVec4<usize>) -> Self {
        Self {
            length: tokens.len(),
            tokens,
            occurrences,
        }
    }

    /// Whether the substring occurs in the given source.
    pub fn occurs_in(&self, source: usize) -> bool {
        self.occurrences.binary_search(&source).is_ok()
    }
}
