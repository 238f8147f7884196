//! Configuration system for seqclust.
//! TOML-based, `Option` fields with `effective_*` accessors for defaults.

pub mod clustering_config;
pub mod matcher_config;
pub mod seqclust_config;

pub use clustering_config::ClusteringConfig;
pub use matcher_config::MatcherConfig;
pub use seqclust_config::SeqclustConfig;
