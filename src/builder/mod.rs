//! Builder API for assembling a switcher from its collaborators.
//!
//! # Example
//!
//! ```
//! use wallswitch::builder::SwitcherBuilder;
//! use wallswitch::config::SwitchConfig;
//! use wallswitch::env::{ActiveModules, FixedGeometry, ModuleDefinition, StaticRegistry};
//! use wallswitch::testing::RecordingRuntime;
//!
//! let switcher = SwitcherBuilder::new()
//!     .registry(StaticRegistry::new().with(ModuleDefinition::new("clock")))
//!     .runtime(RecordingRuntime::new())
//!     .ticker(ActiveModules::new())
//!     .geometry(FixedGeometry::default())
//!     .config(SwitchConfig::default().with_transition_window_ms(2_000))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(switcher.config().transition_window_ms, 2_000);
//! ```

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::SwitcherBuilder;
