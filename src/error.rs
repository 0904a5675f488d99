//! Error types for hostscope.

use thiserror::Error;

/// Error type for hostscope operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Rule definition matched none of the accepted host syntaxes
    #[error("invalid host: {0}")]
    InvalidHost(String),

    /// Target collides with an active exclude rule
    #[error("target {0} is excluded")]
    TargetExcluded(String),

    /// Target was never registered
    #[error("target {0} is not in scope")]
    TargetNotFound(String),

    /// Wildcard rule could not be compiled
    #[error("invalid wildcard pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for hostscope operations.
pub type Result<T> = std::result::Result<T, Error>;
