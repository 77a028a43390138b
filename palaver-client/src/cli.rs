//! Command-line argument parsing for the palaver client
//!
//! Uses clap for argument parsing with derive macros.

use clap::Parser;

use crate::config::SessionConfig;

/// palaver - console chat client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Server host to connect to
    ///
    /// Overrides the host from the config file.
    #[arg(long, env = "PALAVER_HOST")]
    pub host: Option<String>,

    /// Server port to connect to
    ///
    /// Overrides the port from the config file.
    #[arg(long, env = "PALAVER_PORT")]
    pub port: Option<u16>,

    /// Initial display name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Initial room code
    #[arg(long, short = 'r')]
    pub room: Option<String>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Apply CLI overrides on top of loaded configuration
    pub fn apply(&self, mut config: SessionConfig) -> SessionConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(room) = &self.room {
            config.room = room.clone();
        }
        config
    }
}
