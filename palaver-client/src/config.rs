//! Client-side configuration loading
//!
//! Session defaults live in `~/.config/palaver/config.toml`; command-line
//! arguments override them per invocation.

use std::path::Path;

use palaver_utils::paths;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7071;
pub const DEFAULT_NAME: &str = "Default";
pub const DEFAULT_ROOM: &str = "AAAAA";

/// Connection settings for one [`crate::Session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Initial display name
    pub name: String,
    /// Initial room code
    pub room: String,
}

impl SessionConfig {
    /// Create a configuration for the given server with default identity
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            name: DEFAULT_NAME.into(),
            room: DEFAULT_ROOM.into(),
        }
    }

    /// Set the initial display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the initial room code
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    /// The "host:port" target string
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

/// On-disk configuration (all fields optional)
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    name: Option<String>,
    room: Option<String>,
}

impl FileConfig {
    fn apply(self, mut config: SessionConfig) -> SessionConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(name) = self.name {
            config.name = name;
        }
        if let Some(room) = self.room {
            config.room = room;
        }
        config
    }
}

/// Load session settings from the config file
///
/// Returns defaults if the file doesn't exist or can't be parsed.
pub fn load() -> SessionConfig {
    load_from(&paths::config_file())
}

fn load_from(path: &Path) -> SessionConfig {
    if !path.exists() {
        tracing::debug!("Config file not found, using defaults");
        return SessionConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<FileConfig>(&content) {
            Ok(file) => file.apply(SessionConfig::default()),
            Err(e) => {
                tracing::warn!("Failed to parse config file: {}, using defaults", e);
                SessionConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file: {}, using defaults", e);
            SessionConfig::default()
        }
    }
}
