//! Programmatic configuration builder for integration tests

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use encore_config::{Config, CorsConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config pointed at `base_url`, staging uploads under `staging_dir`
    pub fn new(base_url: &str, staging_dir: &Path) -> Self {
        let mut config = Config::default();
        config.server.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.server.port = 0;
        config.server.staging_dir = Some(staging_dir.to_path_buf());
        config.provider.api_key = Some(SecretString::from("test-key"));
        config.provider.base_url = base_url.parse().expect("valid URL");
        config.provider.timeout = "5s".to_owned();
        config.provider.transcription_timeout = "5s".to_owned();

        Self { config }
    }

    /// Set the provider request timeout
    pub fn with_timeout(mut self, timeout: &str) -> Self {
        self.config.provider.timeout = timeout.to_owned();
        self.config.provider.transcription_timeout = timeout.to_owned();
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
