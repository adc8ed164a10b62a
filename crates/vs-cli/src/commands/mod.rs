//! CLI command implementations

mod connect;
mod register;

pub use connect::{connect_command, pick_command, resolve_target};
pub use register::register_command;

use anyhow::Result;
use vs_core::{HostsFile, NodeSource, Paths, SessionDispatcher, Settings, SourceKind, TailscalePeers};

/// Paths and settings shared by the commands
#[derive(Debug, Clone)]
pub struct App {
    /// Where the hosts file, settings and control sockets live
    pub paths: Paths,
    /// Contents of `config.toml`, or defaults when it is absent
    pub settings: Settings,
}

impl App {
    /// Resolve the per-user root and read its settings
    pub fn load() -> Result<Self> {
        let paths = Paths::from_env()?;
        let settings = Settings::load(&paths)?;
        tracing::debug!(
            "Using root {:?} with {} node source",
            paths.root(),
            settings.nodes.source
        );
        Ok(Self { paths, settings })
    }

    /// The configured node source
    ///
    /// # Arguments
    /// * `include_offline` - Keep offline Tailscale peers; ignored by the hosts file
    ///
    /// # Returns
    /// A boxed [`NodeSource`] chosen by `[nodes] source` in the settings.
    pub fn node_source(&self, include_offline: bool) -> Box<dyn NodeSource> {
        match self.settings.nodes.source {
            SourceKind::Hosts => Box::new(HostsFile::new(self.paths.hosts_file())),
            SourceKind::Tailscale => Box::new(TailscalePeers::new(include_offline)),
        }
    }

    /// Dispatcher using this root's control dir and the `[ssh]` settings
    pub fn dispatcher(&self) -> SessionDispatcher {
        SessionDispatcher::new(&self.paths, self.settings.ssh.clone())
    }
}
