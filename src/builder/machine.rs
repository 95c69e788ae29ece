//! Builder for constructing switchers.

use crate::builder::error::BuildError;
use crate::config::SwitchConfig;
use crate::core::Timestamp;
use crate::env::{
    GeometryProvider, ModuleRegistry, ModuleRuntime, MonitoringSink, SwitchEnv, Ticker,
};
use crate::switch::ModuleSwitcher;
use chrono::Utc;

/// Builder for constructing a [`ModuleSwitcher`] with a fluent API.
#[derive(Default)]
pub struct SwitcherBuilder {
    registry: Option<Box<dyn ModuleRegistry>>,
    runtime: Option<Box<dyn ModuleRuntime>>,
    ticker: Option<Box<dyn Ticker>>,
    geometry: Option<Box<dyn GeometryProvider>>,
    monitor: Option<Box<dyn MonitoringSink>>,
    config: SwitchConfig,
    start: Option<Timestamp>,
}

impl SwitcherBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the module registry (required).
    pub fn registry(mut self, registry: impl ModuleRegistry + 'static) -> Self {
        self.registry = Some(Box::new(registry));
        self
    }

    /// Set the module runtime (required).
    pub fn runtime(mut self, runtime: impl ModuleRuntime + 'static) -> Self {
        self.runtime = Some(Box::new(runtime));
        self
    }

    /// Set the active-set ticker (required).
    pub fn ticker(mut self, ticker: impl Ticker + 'static) -> Self {
        self.ticker = Some(Box::new(ticker));
        self
    }

    /// Set the geometry provider (required).
    pub fn geometry(mut self, geometry: impl GeometryProvider + 'static) -> Self {
        self.geometry = Some(Box::new(geometry));
        self
    }

    /// Install a monitoring sink. Observations only flow when the config
    /// enables monitoring.
    pub fn monitor(mut self, sink: impl MonitoringSink + 'static) -> Self {
        self.monitor = Some(Box::new(sink));
        self
    }

    pub fn config(mut self, config: SwitchConfig) -> Self {
        self.config = config;
        self
    }

    /// Initial clock reading. Defaults to the current time.
    pub fn start_at(mut self, start: Timestamp) -> Self {
        self.start = Some(start);
        self
    }

    /// Build the switcher.
    /// Returns an error if a collaborator is missing or the config is invalid.
    pub fn build(self) -> Result<ModuleSwitcher, BuildError> {
        let registry = self.registry.ok_or(BuildError::MissingRegistry)?;
        let runtime = self.runtime.ok_or(BuildError::MissingRuntime)?;
        let ticker = self.ticker.ok_or(BuildError::MissingTicker)?;
        let geometry = self.geometry.ok_or(BuildError::MissingGeometry)?;
        let config = self.config.validated()?;

        let env = SwitchEnv {
            registry,
            runtime,
            ticker,
            geometry,
            monitor: self.monitor,
        };
        let start = self.start.unwrap_or_else(Utc::now);
        Ok(ModuleSwitcher::new(env, config, start))
    }
}
