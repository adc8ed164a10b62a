//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Port the ssh client uses when none is given
pub const DEFAULT_SSH_PORT: u16 = 22;

/// A named, addressable ssh destination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Display name, also the primary matching key
    #[serde(alias = "hostname")]
    pub name: String,

    /// Hostname or IP literal used to connect
    pub address: String,

    /// Explicit port; `None` and 22 both mean the client default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Remote login; `None` lets the ssh client decide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Advisory OS label, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    /// MagicDNS name, only set for peers discovered over Tailscale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
}

impl Node {
    /// Create a node with just a name and an address
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            ..Default::default()
        }
    }

    /// Set an explicit port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the remote login
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the OS label
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    /// The port to pass to the client, if it differs from the default
    ///
    /// A stored 0 is not a usable port and counts as absent.
    pub fn port_override(&self) -> Option<u16> {
        self.port.filter(|p| *p != 0 && *p != DEFAULT_SSH_PORT)
    }

    /// Destination string in `user@host` form, or just `host`
    pub fn destination(&self) -> String {
        match self.user.as_deref() {
            Some(user) if !user.is_empty() => format!("{}@{}", user, self.address),
            _ => self.address.clone(),
        }
    }

    /// One-line description used under the name in listings
    pub fn description(&self) -> String {
        let mut parts = vec![self.address.clone()];
        if let Some(os) = self.os.as_deref().filter(|os| !os.is_empty()) {
            parts.push(os.to_string());
        }
        if let Some(port) = self.port_override() {
            parts.push(format!("port {}", port));
        }
        parts.join("  ")
    }

    /// Text the picker filters against
    pub fn filter_key(&self) -> String {
        format!("{} {}", self.name, self.address).to_lowercase()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.destination())
    }
}

/// Sort nodes by case-insensitive name, keeping the relative order of equal names
pub fn sort_nodes(nodes: &mut [Node]) {
    nodes.sort_by_cached_key(|n| n.name.to_lowercase());
}

/// Index at which `node` keeps `nodes` sorted, after any equal names
pub fn sorted_position(nodes: &[Node], node: &Node) -> usize {
    let key = node.name.to_lowercase();
    nodes.partition_point(|n| n.name.to_lowercase() <= key)
}

/// What a session is opened against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A node from the known set
    Node(Node),
    /// A user-supplied string handed to the client untouched
    Raw(String),
}

impl Target {
    /// Destination argument for the ssh client
    pub fn destination(&self) -> String {
        match self {
            Target::Node(node) => node.destination(),
            Target::Raw(raw) => raw.clone(),
        }
    }

    /// Explicit port, only ever present for nodes
    pub fn port_override(&self) -> Option<u16> {
        match self {
            Target::Node(node) => node.port_override(),
            Target::Raw(_) => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Node(node) => write!(f, "{}", node),
            Target::Raw(raw) => write!(f, "{}", raw),
        }
    }
}
