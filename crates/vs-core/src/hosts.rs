//! Persisted host list
//!
//! Nodes live in `hosts.toml` under the per-user root as an array of
//! `[[hosts]]` tables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::create_private_dir;
use crate::error::SourceError;
use crate::traits::NodeSource;
use crate::types::{sort_nodes, Node};

#[derive(Debug, Default, Serialize, Deserialize)]
struct HostsDocument {
    #[serde(default)]
    hosts: Vec<Node>,
}

/// Node source backed by a TOML file
#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
}

impl HostsFile {
    /// Use the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document in file order; `Ok(None)` when the file is absent
    fn read_document(&self) -> Result<Option<HostsDocument>, SourceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SourceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| SourceError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn write_document(&self, doc: &HostsDocument) -> Result<(), SourceError> {
        if let Some(parent) = self.path.parent() {
            create_private_dir(parent).map_err(|source| SourceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(doc)?;
        let io_err = |source| SourceError::Io {
            path: self.path.clone(),
            source,
        };
        std::fs::write(&self.path, content).map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }

        Ok(())
    }
}

impl NodeSource for HostsFile {
    fn kind(&self) -> &'static str {
        "hosts file"
    }

    fn load(&self) -> Result<Vec<Node>, SourceError> {
        let doc = self
            .read_document()?
            .ok_or_else(|| SourceError::NoConfig(self.path.clone()))?;

        let mut nodes = doc.hosts;
        sort_nodes(&mut nodes);
        tracing::debug!("Loaded {} hosts from {:?}", nodes.len(), self.path);
        Ok(nodes)
    }

    fn append(&self, node: &Node) -> Result<(), SourceError> {
        let mut doc = self.read_document()?.unwrap_or_default();
        doc.hosts.push(node.clone());
        self.write_document(&doc)?;
        tracing::debug!("Appended {} to {:?}", node.name, self.path);
        Ok(())
    }
}
