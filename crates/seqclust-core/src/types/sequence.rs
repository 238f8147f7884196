//! Shared, immutable token sequences.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::identifiers::Token;

/// An immutable token sequence behind an `Arc`.
///
/// Cloning shares the allocation. Equality and hashing compare tokens;
/// `ptr_eq` compares allocations, which is how representative propagation
/// is observed: a merged cluster's sequence is always a clone of one of its
/// constituents', never a rebuilt copy.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(Arc<[Token]>);

impl Sequence {
    /// Build a sequence from raw token values.
    pub fn from_raw(raw: &[u32]) -> Self {
        raw.iter().copied().map(Token).collect()
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    /// Whether `needle` occurs as a contiguous run inside this sequence.
    pub fn contains_run(&self, needle: &[Token]) -> bool {
        contains_run(&self.0, needle)
    }
}

/// Contiguous-run containment over plain slices.
pub fn contains_run(haystack: &[Token], needle: &[Token]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}

impl Deref for Sequence {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.0
    }
}

impl AsRef<[Token]> for Sequence {
    fn as_ref(&self) -> &[Token] {
        &self.0
    }
}

impl From<Vec<Token>> for Sequence {
    fn from(tokens: Vec<Token>) -> Self {
        Self(tokens.into())
    }
}

impl From<&[Token]> for Sequence {
    fn from(tokens: &[Token]) -> Self {
        Self(tokens.into())
    }
}

impl FromIterator<Token> for Sequence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(|t| t.0)).finish()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", token.0)?;
        }
        write!(f, "]")
    }
}
