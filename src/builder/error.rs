//! Build errors for the switcher builder.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur when building a switcher.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Module registry not specified. Call .registry(registry) before .build()")]
    MissingRegistry,

    #[error("Module runtime not specified. Call .runtime(runtime) before .build()")]
    MissingRuntime,

    #[error("Ticker not specified. Call .ticker(ticker) before .build()")]
    MissingTicker,

    #[error("Geometry provider not specified. Call .geometry(provider) before .build()")]
    MissingGeometry,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
