#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod provider;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use loader::API_KEY_ENV;
pub use provider::*;
pub use server::*;
pub use telemetry::{ExportProtocol, ExporterConfig, LogFormat, TelemetryConfig};

/// Top-level Encore configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream AI provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Logging and trace export configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
