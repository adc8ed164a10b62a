//! Configuration management for vibessh

mod settings;

pub use settings::{NodeSettings, Settings, SourceKind, SshSettings};

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Environment variable that relocates the per-user root
pub const HOME_ENV: &str = "VIBESSH_HOME";

/// Directory name of the per-user root under `$HOME`
const ROOT_DIR_NAME: &str = ".vibessh";

/// Well-known locations under the per-user root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    /// Anchor all paths at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$VIBESSH_HOME` if set, otherwise `~/.vibessh`
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(root));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::new(home.join(ROOT_DIR_NAME)))
    }

    /// The per-user root itself
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persisted node list
    pub fn hosts_file(&self) -> PathBuf {
        self.root.join("hosts.toml")
    }

    /// Optional settings file
    pub fn settings_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Directory holding ssh ControlMaster sockets
    pub fn control_dir(&self) -> PathBuf {
        self.root.join("ctrl")
    }
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Create `dir` and its parents, owner-only on unix
pub fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder.create(dir)
}
