//! vs-core: node resolution and ssh session dispatch for vibessh
//!
//! This crate holds the node model, the node sources (hosts file and
//! Tailscale peers), the token matcher, the ssh dispatcher and the
//! reverse-tunnel registration used by the `vibessh` binary.

pub mod config;
pub mod error;
pub mod hosts;
pub mod matcher;
pub mod register;
pub mod session;
pub mod tailscale;
pub mod traits;
pub mod types;

pub use config::{Paths, Settings, SourceKind};
pub use error::{ConfigError, DispatchError, SourceError};
pub use hosts::HostsFile;
pub use matcher::match_node;
pub use session::{SessionDispatcher, SshCommand};
pub use tailscale::TailscalePeers;
pub use traits::NodeSource;
pub use types::{Node, Target};
