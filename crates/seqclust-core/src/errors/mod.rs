//! Error handling for seqclust.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod clustering_error;
pub mod config_error;
pub mod error_code;
pub mod tree_error;

pub use clustering_error::ClusteringError;
pub use config_error::ConfigError;
pub use error_code::SeqclustErrorCode;
pub use tree_error::ClusterTreeError;
