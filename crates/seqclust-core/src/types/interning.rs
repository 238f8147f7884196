//! AoI label interning.
//!
//! Uses `lasso::ThreadedRodeo` so upstream stages can intern labels from
//! several threads while building the input sequences.

use lasso::{Key, Spur, ThreadedRodeo};

use super::identifiers::Token;
use super::sequence::Sequence;

/// Maps textual AoI labels to dense `Token`s and back.
///
/// Labels are trimmed before interning, so `"AoI-3"` and `" AoI-3 "` name
/// the same region.
pub struct TokenInterner {
    inner: ThreadedRodeo,
}

impl TokenInterner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self {
            inner: ThreadedRodeo::default(),
        }
    }

    /// Intern a label, returning its token.
    pub fn intern(&self, label: &str) -> Token {
        let spur = self.inner.get_or_intern(label.trim());
        Token(spur.into_usize() as u32)
    }

    /// Look up a previously interned label without inserting.
    pub fn get(&self, label: &str) -> Option<Token> {
        self.inner
            .get(label.trim())
            .map(|spur| Token(spur.into_usize() as u32))
    }

    /// Resolve a token back to its label. `None` for tokens this interner never issued.
    pub fn resolve(&self, token: Token) -> Option<&str> {
        let spur = Spur::try_from_usize(token.index())?;
        self.inner.try_resolve(&spur)
    }

    /// Intern every label of one input sequence.
    pub fn intern_sequence<'a, I>(&self, labels: I) -> Sequence
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels.into_iter().map(|l| self.intern(l)).collect()
    }

    /// Number of distinct labels interned so far.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for TokenInterner {
    fn default() -> Self {
        Self::new()
    }
}
