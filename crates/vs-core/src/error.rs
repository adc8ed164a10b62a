//! Core error types for vibessh

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing a node source
#[derive(Error, Debug)]
pub enum SourceError {
    /// Hosts file does not exist yet
    #[error("no hosts file at {}", .0.display())]
    NoConfig(PathBuf),

    /// Hosts file exists but cannot be parsed
    #[error("parse {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Hosts file could not be serialized
    #[error("serialize hosts: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Filesystem failure on the hosts file or its directory
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The `tailscale` binary is not on PATH
    #[error("tailscale is not installed")]
    TailscaleNotInstalled,

    /// tailscaled is unreachable or not in the Running state
    #[error("tailscale is not running ({0}). Try: sudo tailscale up")]
    TailscaleNotRunning(String),

    /// The local API refused us
    #[error("permission denied talking to tailscaled: add yourself to the tailscale group")]
    PermissionDenied,

    /// Any other failure from the tailscale status query
    #[error("tailscale status: {0}")]
    Tailscale(String),

    /// The source cannot store nodes
    #[error("{0} does not support adding hosts")]
    ReadOnly(&'static str),
}

/// Errors that stop a session from being dispatched
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The control socket directory could not be created
    #[error("create control dir {}: {source}", path.display())]
    ControlDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ssh client could not be located
    #[error("{0} not found in PATH")]
    ClientNotFound(String),

    /// Replacing the process image failed
    #[error("exec {}: {source}", program.display())]
    Exec {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Config file is not valid TOML for the expected shape
    #[error("parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Reading or writing the file failed
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No home directory to anchor the config root
    #[error("cannot determine home directory")]
    NoHomeDir,
}

