//! Top-level seqclust configuration.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ClusteringConfig, MatcherConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Every field is optional in TOML; missing sections and keys fall back to
/// compiled defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SeqclustConfig {
    pub clustering: ClusteringConfig,
    pub matcher: MatcherConfig,
}

impl SeqclustConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let config = Self::parse(&content, &path.display().to_string())?;
        ::tracing::debug!(
            path = %path.display(),
            link_policy = config.clustering.effective_link_policy().name(),
            min_length = config.matcher.effective_min_length(),
            "loaded seqclust config"
        );
        Ok(config)
    }

    /// Load and validate configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Self::parse(toml_str, "<string>")
    }

    fn parse(toml_str: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML. Unset keys are omitted.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::RenderFailed {
            message: e.to_string(),
        })
    }

    /// Reject zero for every count and duration that is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("matcher.min_length", self.matcher.min_length.map(|v| v as u64))?;
        positive(
            "clustering.max_iterations",
            self.clustering.max_iterations.map(|v| v as u64),
        )?;
        positive("clustering.timeout_ms", self.clustering.timeout_ms)
    }
}

fn positive(field: &'static str, value: Option<u64>) -> Result<(), ConfigError> {
    match value {
        Some(0) => Err(ConfigError::ValidationFailed {
            field,
            message: "must be greater than 0".to_string(),
        }),
        _ => Ok(()),
    }
}
