//! Switch request errors.

use thiserror::Error;

/// Errors returned from [`ModuleSwitcher::request_switch`].
///
/// [`ModuleSwitcher::request_switch`]: crate::switch::ModuleSwitcher::request_switch
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwitchError {
    /// The registry has no module with this name. This is a configuration
    /// mistake and is not retried.
    #[error("Module '{name}' is not registered")]
    UnknownModule { name: String },
}
