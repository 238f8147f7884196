//! seqclust-core: foundation crate for the seqclust clustering engine.
//!
//! - Types: tokens and interning, shared sequences, clusters, matcher results
//! - Traits: the sequence matcher seam and cooperative cancellation
//! - Errors: one `thiserror` enum per subsystem with stable error codes
//! - Config: TOML-backed configuration with validated defaults
//! - Tracing: `tracing-subscriber` setup driven by `SEQCLUST_LOG`

pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use config::{ClusteringConfig, MatcherConfig, SeqclustConfig};
pub use errors::{ClusterTreeError, ClusteringError, ConfigError, SeqclustErrorCode};
pub use traits::{Cancellable, CancellationToken, SequenceMatcher};
pub use types::{
    Cluster, ClusterId, CommonSubstring, LinkPolicy, Representative, Sequence, Token, TokenInterner,
};
