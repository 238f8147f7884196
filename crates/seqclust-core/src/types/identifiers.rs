//! Newtype identifiers.
//!
//! `Token` names one area of interest; `ClusterId` is the arena index a
//! cluster receives at creation. Keeping them distinct prevents a token from
//! being used where a cluster is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new ID from its raw value.
            pub fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw value.
            pub fn get(self) -> u32 {
                self.0
            }

            /// The raw value as an index.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Opaque area-of-interest identifier.
    Token,
    "t"
);

define_id!(
    /// Stable cluster identifier. Leaves take `0..n` in input order,
    /// merges continue from `n` in creation order.
    ClusterId,
    "c"
);

/// How the hierarchy finds the predecessor nodes of a new merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPolicy {
    /// Link to the nodes of the two constituents, by cluster id.
    #[default]
    Identity,
    /// Link to every node whose representative sequence equals one of the
    /// constituents' sequences. Distinct clusters sharing a representative
    /// are conflated.
    SequenceValue,
}

impl LinkPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::SequenceValue => "sequence_value",
        }
    }
}
