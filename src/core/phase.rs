//! Phase tags for the module switch lifecycle.
//!
//! A `Phase` names which state variant the switcher is in without carrying
//! the variant's data, so it can be logged, serialized and compared freely.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle phase of a module swap.
///
/// The switcher cycles `Idle → Preparing → Transitioning → Displaying →
/// Preparing → …` indefinitely. There is no terminal phase.
///
/// # Example
///
/// ```rust
/// use wallswitch::core::Phase;
///
/// assert_eq!(Phase::Preparing.name(), "Preparing");
/// assert!(Phase::Displaying.is_steady());
/// assert!(Phase::Transitioning.is_in_flight());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing requested yet; an empty placeholder is on screen.
    Idle,
    /// Waiting for the requested module to load and become ready to show.
    Preparing,
    /// Old and new modules overlap on the wall.
    Transitioning,
    /// Exactly one module is active and visible.
    Displaying,
}

impl Phase {
    /// Get the phase's name for display/logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Preparing => "Preparing",
            Self::Transitioning => "Transitioning",
            Self::Displaying => "Displaying",
        }
    }

    /// Check if a switch request is being carried through this phase.
    ///
    /// Requests arriving during an in-flight phase preempt the earlier one.
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::Preparing | Self::Transitioning)
    }

    /// Check if no timers can be outstanding in this phase.
    pub const fn is_steady(&self) -> bool {
        matches!(self, Self::Idle | Self::Displaying)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
