//! Collaborators the switcher drives.
//!
//! The switcher owns none of the rendering machinery. Everything it needs
//! from the outside world is injected through the traits in this module:
//!
//! - [`ModuleRegistry`] resolves names to [`ModuleDefinition`]s
//! - [`ModuleRuntime`] turns definitions into running [`ModuleHandle`]s
//! - [`Ticker`] is the active set the rendering loop ticks
//! - [`GeometryProvider`] reports where modules render
//! - [`MonitoringSink`] optionally receives [`Observation`]s
//!
//! Stock implementations ([`StaticRegistry`], [`ActiveModules`],
//! [`FixedGeometry`], [`RecordingSink`], [`JsonLinesSink`]) cover the simple
//! cases.

mod geometry;
mod module;
mod monitor;
mod signal;
mod ticker;

pub use geometry::{FixedGeometry, Geometry, GeometryProvider};
pub use module::{
    EmptyModule, ModuleDefinition, ModuleHandle, ModuleId, ModuleRegistry, ModuleRuntime,
    RunningModule, StaticRegistry, EMPTY_MODULE_NAME,
};
pub use monitor::{JsonLinesSink, MonitoringSink, Observation, RecordingSink, SwitchEvent};
pub use signal::Signal;
pub use ticker::{ActiveModules, Ticker};

/// The full set of collaborators handed to a switcher.
pub struct SwitchEnv {
    pub(crate) registry: Box<dyn ModuleRegistry>,
    pub(crate) runtime: Box<dyn ModuleRuntime>,
    pub(crate) ticker: Box<dyn Ticker>,
    pub(crate) geometry: Box<dyn GeometryProvider>,
    pub(crate) monitor: Option<Box<dyn MonitoringSink>>,
}

impl SwitchEnv {
    pub fn new(
        registry: impl ModuleRegistry + 'static,
        runtime: impl ModuleRuntime + 'static,
        ticker: impl Ticker + 'static,
        geometry: impl GeometryProvider + 'static,
    ) -> Self {
        Self {
            registry: Box::new(registry),
            runtime: Box::new(runtime),
            ticker: Box::new(ticker),
            geometry: Box::new(geometry),
            monitor: None,
        }
    }

    pub fn with_monitor(mut self, sink: impl MonitoringSink + 'static) -> Self {
        self.monitor = Some(Box::new(sink));
        self
    }
}
