//! User settings read from `config.toml`

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{load_config, Paths};
use crate::error::ConfigError;

/// Top-level settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How the ssh client is invoked
    pub ssh: SshSettings,

    /// Where nodes come from
    pub nodes: NodeSettings,
}

impl Settings {
    /// Load settings for `paths`; a missing file yields defaults
    pub fn load(paths: &Paths) -> Result<Self, ConfigError> {
        match load_config(&paths.settings_file()) {
            Ok(settings) => Ok(settings),
            Err(ConfigError::NotFound(path)) => {
                tracing::debug!("No settings at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }
}

/// External ssh client options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshSettings {
    /// Client program; a bare name is searched on PATH
    pub program: String,

    /// How long a master connection lingers once idle
    pub control_persist: String,

    /// Seconds between keepalive probes
    pub server_alive_interval: u32,

    /// Unanswered probes before the client gives up
    pub server_alive_count_max: u32,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            control_persist: "10m".to_string(),
            server_alive_interval: 15,
            server_alive_count_max: 3,
        }
    }
}

/// Node source selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSettings {
    /// Which source feeds the picker and the matcher
    pub source: SourceKind,

    /// Show offline Tailscale peers in the picker
    pub include_offline: bool,
}

/// Available node sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The persisted hosts file
    #[default]
    Hosts,
    /// Live peers from the local tailscaled
    Tailscale,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Hosts => write!(f, "hosts"),
            SourceKind::Tailscale => write!(f, "tailscale"),
        }
    }
}
