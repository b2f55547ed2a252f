use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig};

/// Port used when neither the config file nor `PORT` sets one
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory that holds uploads while they are being transcribed
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
    #[serde(default)]
    pub health: HealthConfig,
    /// CORS settings; a permissive policy applies when absent
    #[serde(default)]
    pub cors: Option<CorsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            staging_dir: None,
            health: HealthConfig::default(),
            cors: None,
        }
    }
}

impl ServerConfig {
    /// Socket address the listener binds to
    pub const fn listen_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Resolved staging directory, defaulting to `<tmp>/encore-uploads`
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("encore-uploads"))
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

#[allow(clippy::missing_const_for_fn)]
fn default_port() -> u16 {
    DEFAULT_PORT
}
