//! Configuration errors.

use std::path::PathBuf;

use super::error_code::{self, SeqclustErrorCode};

/// Loading, parsing or validating a `SeqclustConfig` failed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Cannot read config file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `origin` is the file path, or `<string>` for inline TOML.
    #[error("Invalid TOML in {origin}: {message}")]
    ParseError { origin: String, message: String },

    #[error("Cannot render config as TOML: {message}")]
    RenderFailed { message: String },

    #[error("Invalid value for {field}: {message}")]
    ValidationFailed { field: &'static str, message: String },
}

impl SeqclustErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } | Self::Unreadable { .. } => error_code::CONFIG_UNAVAILABLE,
            Self::ParseError { .. } | Self::RenderFailed { .. } => error_code::CONFIG_FORMAT,
            Self::ValidationFailed { .. } => error_code::CONFIG_INVALID,
        }
    }
}
