//! Switcher configuration.
//!
//! Configuration is plain serde data, loadable from JSON. Validation uses
//! Stillwater's `Validation` type so that every problem is reported at once
//! instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use wallswitch::config::SwitchConfig;
//!
//! let config = SwitchConfig::from_json(r#"{ "transition_window_ms": 2000 }"#).unwrap();
//! assert_eq!(config.transition_window_ms, 2000);
//! assert!(!config.monitoring);
//!
//! assert!(SwitchConfig::from_json(r#"{ "transition_window_ms": 0 }"#).is_err());
//! ```

pub mod error;

pub use error::{ConfigError, ConfigViolation};

use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Overlap between old and new module when none is configured.
pub const DEFAULT_TRANSITION_WINDOW_MS: u64 = 5_000;

/// Longest overlap accepted by validation (one hour).
pub const MAX_TRANSITION_WINDOW_MS: u64 = 3_600_000;

/// Tunables of a switcher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    /// How long old and new modules are both active after the deadline.
    pub transition_window_ms: u64,

    /// Send observations to the monitoring sink, when one is installed.
    pub monitoring: bool,

    /// Phase transitions kept in the switcher's history.
    pub history_limit: usize,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            transition_window_ms: DEFAULT_TRANSITION_WINDOW_MS,
            monitoring: false,
            history_limit: crate::core::PhaseHistory::DEFAULT_LIMIT,
        }
    }
}

impl SwitchConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validated()
    }

    pub fn with_transition_window_ms(mut self, window_ms: u64) -> Self {
        self.transition_window_ms = window_ms;
        self
    }

    pub fn with_monitoring(mut self, monitoring: bool) -> Self {
        self.monitoring = monitoring;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// The transition window as a chrono duration, clamped to the maximum.
    pub fn transition_window(&self) -> chrono::Duration {
        let window_ms = self.transition_window_ms.min(MAX_TRANSITION_WINDOW_MS);
        chrono::Duration::milliseconds(window_ms as i64)
    }

    /// Check every rule, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        let window = if self.transition_window_ms == 0 {
            Validation::fail(ConfigViolation::ZeroTransitionWindow)
        } else if self.transition_window_ms > MAX_TRANSITION_WINDOW_MS {
            Validation::fail(ConfigViolation::TransitionWindowTooLong {
                window_ms: self.transition_window_ms,
                max_ms: MAX_TRANSITION_WINDOW_MS,
            })
        } else {
            Validation::success(())
        };
        checks.push(window);

        let history = if self.history_limit == 0 {
            Validation::fail(ConfigViolation::ZeroHistoryLimit)
        } else {
            Validation::success(())
        };
        checks.push(history);

        Validation::all_vec(checks).map(|_| ())
    }

    /// Validate, turning accumulated violations into a `ConfigError`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(errors) => Err(ConfigError::Invalid(
                errors.iter().cloned().collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SwitchConfig::default();
        assert_eq!(config.transition_window_ms, 5_000);
        assert_eq!(config.transition_window(), chrono::Duration::seconds(5));
        assert!(config.validate().is_success());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let config = SwitchConfig::default()
            .with_transition_window_ms(0)
            .with_history_limit(0);

        match config.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::ZeroTransitionWindow)));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::ZeroHistoryLimit)));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn overlong_window_is_rejected() {
        let err = SwitchConfig::default()
            .with_transition_window_ms(MAX_TRANSITION_WINDOW_MS + 1)
            .validated()
            .unwrap_err();

        match err {
            ConfigError::Invalid(violations) => assert_eq!(
                violations,
                vec![ConfigViolation::TransitionWindowTooLong {
                    window_ms: MAX_TRANSITION_WINDOW_MS + 1,
                    max_ms: MAX_TRANSITION_WINDOW_MS,
                }]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn transition_window_is_clamped() {
        let config = SwitchConfig::default().with_transition_window_ms(u64::MAX);
        assert_eq!(
            config.transition_window(),
            chrono::Duration::milliseconds(MAX_TRANSITION_WINDOW_MS as i64)
        );
    }

    #[test]
    fn from_json_fills_defaults() {
        let config = SwitchConfig::from_json(r#"{ "monitoring": true }"#).unwrap();
        assert!(config.monitoring);
        assert_eq!(config.transition_window_ms, DEFAULT_TRANSITION_WINDOW_MS);
    }

    #[test]
    fn from_json_reports_parse_errors() {
        let err = SwitchConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_error_lists_every_violation() {
        let err = SwitchConfig::from_json(r#"{ "transition_window_ms": 0, "history_limit": 0 }"#)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("transition window must be greater than zero"));
        assert!(message.contains("history limit must be greater than zero"));
    }
}
