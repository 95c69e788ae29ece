//! Configuration error types.

use thiserror::Error;

/// A single reason a configuration is rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("transition window must be greater than zero")]
    ZeroTransitionWindow,

    #[error("transition window of {window_ms}ms exceeds the maximum of {max_ms}ms")]
    TransitionWindowTooLong { window_ms: u64, max_ms: u64 },

    #[error("history limit must be greater than zero")]
    ZeroHistoryLimit,
}

/// Errors that can occur while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// The configuration parsed but holds invalid values
    #[error(
        "Invalid configuration: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    Invalid(Vec<ConfigViolation>),
}
