//! Wallswitch: deadline-driven module switching for content walls
//!
//! A content wall shows exactly one display module at a time. Switching to
//! another module is requested ahead of time, for a precise deadline, and
//! must survive slow modules and newer requests arriving mid-switch.
//!
//! # Core Concepts
//!
//! - **Phases**: Idle → Preparing → Transitioning → Displaying, cycling
//!   forever
//! - **Deadlines**: the new module joins the wall at the deadline and the old
//!   one leaves after the transition window
//! - **Preemption**: the latest request wins; superseded requests are
//!   abandoned cleanly and their handles never complete
//! - **Collaborators**: registry, runtime, ticker, geometry and monitoring
//!   are injected traits, see [`env`]
//!
//! # Example
//!
//! ```rust
//! use wallswitch::testing::Harness;
//! use wallswitch::env::ModuleDefinition;
//! use wallswitch::{CompletionStatus, Phase};
//! use chrono::Duration;
//!
//! let mut harness = Harness::new(vec![
//!     ModuleDefinition::new("clock"),
//!     ModuleDefinition::new("weather"),
//! ]);
//! let t0 = harness.start + Duration::seconds(1);
//!
//! let mut clock = harness.switcher.request_switch("clock", t0).unwrap();
//! let mut weather = harness.switcher.request_switch("weather", t0).unwrap();
//! harness.switcher.advance_to(t0 + Duration::seconds(5));
//!
//! assert_eq!(harness.switcher.phase(), Phase::Displaying);
//! assert_eq!(clock.status(), CompletionStatus::Pending);
//! assert_eq!(weather.status(), CompletionStatus::Displayed);
//! assert_eq!(harness.active.names(), vec!["weather".to_string()]);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod switch;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod timer;

// Re-export commonly used types
pub use crate::core::{Phase, PhaseHistory, PhaseTransition, RequestId, Timestamp};
pub use error::SwitchError;
pub use switch::{CompletionHandle, CompletionStatus, ModuleSwitcher};
