use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use encore_config::Config;

/// Encore relay
#[derive(Debug, Parser)]
#[command(name = "encore", about = "HTTP relay for AI lyric writing, cover art, and song feedback")]
pub struct Args {
    /// Path to configuration file; built-in defaults are used when omitted
    #[arg(short, long, env = "ENCORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Override the full listen address (takes precedence over `--port`)
    #[arg(long, env = "ENCORE_LISTEN")]
    pub listen: Option<SocketAddr>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }

        if let Some(listen) = self.listen {
            config.server.host = listen.ip();
            config.server.port = listen.port();
        }
    }
}
