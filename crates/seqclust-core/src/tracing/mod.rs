//! Observability for seqclust.
//! `tracing` crate with `EnvFilter`, span names shared across crates.

pub mod setup;

pub use setup::{env_filter, init_tracing, DEFAULT_DIRECTIVES, LOG_ENV};

/// Span covering one full clustering run.
pub const CLUSTERING_SPAN: &str = "seqclust.clustering";

/// Span covering one distance-matrix computation.
pub const DISTANCE_SPAN: &str = "seqclust.distance";
