//! SeqclustErrorCode trait: stable codes for every error enum.

/// Every error enum implements this to expose a structured code string
/// that callers can match on without parsing messages.
pub trait SeqclustErrorCode {
    /// Returns the error code string (e.g., "NO_GLOBAL_MATCH").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const EMPTY_INPUT: &str = "EMPTY_INPUT";
pub const NO_GLOBAL_MATCH: &str = "NO_GLOBAL_MATCH";
pub const CLUSTERING_STALLED: &str = "CLUSTERING_STALLED";
pub const ITERATION_LIMIT: &str = "ITERATION_LIMIT";
pub const DEADLINE_EXCEEDED: &str = "DEADLINE_EXCEEDED";
pub const CANCELLED: &str = "CANCELLED";
pub const CONFIG_UNAVAILABLE: &str = "CONFIG_UNAVAILABLE";
pub const CONFIG_FORMAT: &str = "CONFIG_FORMAT";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const MALFORMED_TREE: &str = "MALFORMED_TREE";
