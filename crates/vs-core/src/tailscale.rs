//! Tailscale peer discovery
//!
//! Reads peers from `tailscale status --json` and turns them into nodes.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::process::Command;

use crate::error::SourceError;
use crate::traits::NodeSource;
use crate::types::{sort_nodes, Node};

/// Status response from `tailscale status --json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TailscaleStatus {
    backend_state: String,
    #[serde(default, deserialize_with = "deserialize_null_as_empty_map")]
    peer: HashMap<String, PeerNode>,
}

/// Deserialize null as an empty HashMap
fn deserialize_null_as_empty_map<'de, D, K, V>(deserializer: D) -> Result<HashMap<K, V>, D::Error>
where
    D: serde::Deserializer<'de>,
    K: std::cmp::Eq + std::hash::Hash + Deserialize<'de>,
    V: Deserialize<'de>,
{
    Option::<HashMap<K, V>>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PeerNode {
    #[serde(default)]
    host_name: String,
    #[serde(rename = "DNSName", default)]
    dns_name: String,
    #[serde(rename = "OS", default)]
    os: String,
    #[serde(rename = "TailscaleIPs", default)]
    tailscale_ips: Option<Vec<String>>,
    #[serde(default)]
    online: bool,
}

impl PeerNode {
    fn into_node(self) -> Option<Node> {
        let ips = self.tailscale_ips.unwrap_or_default();
        // Prefer IPv4
        let address = ips
            .iter()
            .find(|ip| !ip.contains(':'))
            .or(ips.first())
            .cloned()?;

        let dns_name = self.dns_name.trim_end_matches('.').to_string();
        let name = if self.host_name.is_empty() {
            dns_name.split('.').next().unwrap_or(&dns_name).to_string()
        } else {
            self.host_name
        };

        Some(Node {
            name,
            address,
            port: None,
            user: None,
            os: Some(self.os).filter(|os| !os.is_empty()),
            dns_name: Some(dns_name).filter(|d| !d.is_empty()),
        })
    }
}

/// Node source backed by the local tailscaled
#[derive(Debug, Clone, Default)]
pub struct TailscalePeers {
    include_offline: bool,
}

impl TailscalePeers {
    /// Query peers, optionally keeping the ones currently offline
    pub fn new(include_offline: bool) -> Self {
        Self { include_offline }
    }

    fn status_json(&self) -> Result<Vec<u8>, SourceError> {
        let output = Command::new("tailscale")
            .args(["status", "--json"])
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SourceError::TailscaleNotInstalled,
                ErrorKind::PermissionDenied => SourceError::PermissionDenied,
                _ => SourceError::Tailscale(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_status_error(&stderr));
        }

        Ok(output.stdout)
    }
}

impl NodeSource for TailscalePeers {
    fn kind(&self) -> &'static str {
        "tailscale"
    }

    fn load(&self) -> Result<Vec<Node>, SourceError> {
        let json = self.status_json()?;
        let nodes = parse_peers(&json, self.include_offline)?;
        tracing::debug!(
            "Found {} tailscale peers (include_offline={})",
            nodes.len(),
            self.include_offline
        );
        Ok(nodes)
    }

    fn append(&self, _node: &Node) -> Result<(), SourceError> {
        Err(SourceError::ReadOnly("tailscale"))
    }
}

/// Map stderr of a failed `tailscale status` to an error kind
pub fn classify_status_error(stderr: &str) -> SourceError {
    let msg = stderr.trim();
    let lower = msg.to_lowercase();

    if lower.contains("permission denied") || lower.contains("access denied") {
        SourceError::PermissionDenied
    } else if lower.contains("no such file")
        || lower.contains("not found")
        || lower.contains("connection refused")
        || lower.contains("is tailscaled running")
        || lower.contains("doesn't appear to be running")
    {
        SourceError::TailscaleNotRunning("tailscaled unreachable".to_string())
    } else if lower.contains("not logged in") || lower.contains("stopped") {
        SourceError::TailscaleNotRunning("logged out".to_string())
    } else {
        SourceError::Tailscale(msg.to_string())
    }
}

/// Parse status JSON into sorted nodes
pub fn parse_peers(json: &[u8], include_offline: bool) -> Result<Vec<Node>, SourceError> {
    let status: TailscaleStatus = serde_json::from_slice(json)
        .map_err(|e| SourceError::Tailscale(format!("parse status JSON: {}", e)))?;

    if status.backend_state != "Running" {
        return Err(SourceError::TailscaleNotRunning(format!(
            "state: {}",
            status.backend_state
        )));
    }

    let mut nodes: Vec<Node> = status
        .peer
        .into_values()
        .filter(|peer| include_offline || peer.online)
        .filter_map(PeerNode::into_node)
        .collect();

    // HashMap order is arbitrary; break name ties on address so output is repeatable
    nodes.sort_by(|a, b| a.address.cmp(&b.address));
    sort_nodes(&mut nodes);
    Ok(nodes)
}
