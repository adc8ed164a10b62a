//! ssh session dispatch
//!
//! Builds the ssh invocation for a target and replaces the current process
//! with it. Every connection asks ssh for ControlMaster reuse keyed on
//! `user@host:port`, so a second connection to the same destination rides
//! the already-authenticated master instead of negotiating again.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use crate::config::{create_private_dir, Paths, SshSettings};
use crate::error::DispatchError;
use crate::types::Target;

/// ControlPath pattern, expanded by ssh to remote user, host and port
const CONTROL_PATH_PATTERN: &str = "%r@%h:%p";

/// A fully composed client invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshCommand {
    /// Resolved client executable
    pub program: PathBuf,
    /// Arguments after argv[0]
    pub args: Vec<String>,
}

impl SshCommand {
    /// Replace the current process image with this command
    ///
    /// Only returns on failure. On success the ssh client owns this PID,
    /// the terminal and every signal from here on.
    #[cfg(unix)]
    pub fn exec(self) -> Result<Infallible, DispatchError> {
        use std::os::unix::process::CommandExt;

        let argv0: std::ffi::OsString = self
            .program
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| self.program.clone().into_os_string());

        tracing::debug!("exec {:?} {:?}", self.program, self.args);
        let source = std::process::Command::new(&self.program)
            .arg0(argv0)
            .args(&self.args)
            .exec();

        Err(DispatchError::Exec {
            program: self.program,
            source,
        })
    }

    /// Run the client as a child and exit with its status
    ///
    /// There is no exec on this platform, so this process stays around as
    /// a thin parent and never returns on success either.
    #[cfg(not(unix))]
    pub fn exec(self) -> Result<Infallible, DispatchError> {
        tracing::debug!("spawn {:?} {:?}", self.program, self.args);
        let status = std::process::Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| DispatchError::Exec {
                program: self.program.clone(),
                source,
            })?;
        std::process::exit(status.code().unwrap_or(1))
    }
}

/// Turns targets into ssh sessions
#[derive(Debug, Clone)]
pub struct SessionDispatcher {
    control_dir: PathBuf,
    ssh: SshSettings,
}

impl SessionDispatcher {
    /// Dispatcher using the control dir under `paths`
    pub fn new(paths: &Paths, ssh: SshSettings) -> Self {
        Self {
            control_dir: paths.control_dir(),
            ssh,
        }
    }

    /// Directory the ControlMaster sockets live in
    pub fn control_dir(&self) -> &Path {
        &self.control_dir
    }

    /// `-o` options asking for multiplexed, kept-alive sessions
    pub fn connect_flags(&self) -> Vec<String> {
        let control_path = self.control_dir.join(CONTROL_PATH_PATTERN);
        let options = [
            "ControlMaster=auto".to_string(),
            format!("ControlPath={}", control_path.display()),
            format!("ControlPersist={}", self.ssh.control_persist),
            format!("ServerAliveInterval={}", self.ssh.server_alive_interval),
            format!("ServerAliveCountMax={}", self.ssh.server_alive_count_max),
        ];

        options
            .into_iter()
            .flat_map(|opt| ["-o".to_string(), opt])
            .collect()
    }

    /// Arguments for `target`: options, then any port, then the destination
    pub fn args_for(&self, target: &Target) -> Vec<String> {
        let mut args = self.connect_flags();
        if let Some(port) = target.port_override() {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        args.push(target.destination());
        args
    }

    /// Create the control dir and resolve the client
    ///
    /// Everything that can fail happens here, before the point of no return.
    pub fn prepare(&self, target: &Target) -> Result<SshCommand, DispatchError> {
        create_private_dir(&self.control_dir).map_err(|source| DispatchError::ControlDir {
            path: self.control_dir.clone(),
            source,
        })?;

        let program = find_program(&self.ssh.program)
            .ok_or_else(|| DispatchError::ClientNotFound(self.ssh.program.clone()))?;

        let args = self.args_for(target);
        tracing::debug!("Dispatching to {} via {:?}", target, program);
        Ok(SshCommand { program, args })
    }

    /// Become an ssh session to `target`; returns only on failure
    pub fn connect(&self, target: &Target) -> Result<Infallible, DispatchError> {
        self.prepare(target)?.exec()
    }
}

/// Locate an executable: paths are checked directly, bare names on PATH
pub fn find_program(name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|full| is_executable(full))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Node;

    fn dispatcher(root: &Path) -> SessionDispatcher {
        SessionDispatcher::new(&Paths::new(root), SshSettings::default())
    }

    #[test]
    fn test_connect_flags() {
        let d = dispatcher(Path::new("/home/me/.vibessh"));
        assert_eq!(
            d.connect_flags(),
            [
                "-o",
                "ControlMaster=auto",
                "-o",
                "ControlPath=/home/me/.vibessh/ctrl/%r@%h:%p",
                "-o",
                "ControlPersist=10m",
                "-o",
                "ServerAliveInterval=15",
                "-o",
                "ServerAliveCountMax=3",
            ]
        );
    }

    #[test]
    fn test_node_with_user_and_port() {
        let d = dispatcher(Path::new("/root"));
        let node = Node::new("beta", "10.0.0.2").with_port(2222).with_user("ops");
        let args = d.args_for(&Target::Node(node));

        let tail = &args[args.len() - 3..];
        assert_eq!(tail, ["-p", "2222", "ops@10.0.0.2"]);
    }

    #[test]
    fn test_default_port_is_omitted() {
        let d = dispatcher(Path::new("/root"));
        let args = d.args_for(&Target::Node(Node::new("alpha", "10.0.0.1").with_port(22)));
        assert!(!args.contains(&"-p".to_string()));
        assert_eq!(args.last().unwrap(), "10.0.0.1");
    }

    #[test]
    fn test_raw_target_passes_through() {
        let d = dispatcher(Path::new("/root"));
        let args = d.args_for(&Target::Raw("unknown.example".to_string()));
        assert!(!args.contains(&"-p".to_string()));
        assert_eq!(args.last().unwrap(), "unknown.example");
        assert_eq!(args.len(), d.connect_flags().len() + 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_prepare_creates_control_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ssh = SshSettings {
            program: "/bin/sh".to_string(),
            ..Default::default()
        };
        let d = SessionDispatcher::new(&Paths::new(dir.path().join("root")), ssh);

        let cmd = d.prepare(&Target::Raw("host".to_string())).unwrap();
        assert!(d.control_dir().is_dir());
        assert_eq!(cmd.program, PathBuf::from("/bin/sh"));
        assert_eq!(cmd.args.last().unwrap(), "host");
    }

    #[test]
    fn test_missing_client_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let ssh = SshSettings {
            program: "vibessh-no-such-client".to_string(),
            ..Default::default()
        };
        let d = SessionDispatcher::new(&Paths::new(dir.path()), ssh);

        let err = d.prepare(&Target::Raw("host".to_string())).unwrap_err();
        assert!(matches!(err, DispatchError::ClientNotFound(_)));
        assert_eq!(err.to_string(), "vibessh-no-such-client not found in PATH");
    }

    #[test]
    fn test_control_dir_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("root");
        std::fs::write(&blocker, "not a directory").unwrap();
        let d = dispatcher(&blocker);

        let err = d.prepare(&Target::Raw("host".to_string())).unwrap_err();
        assert!(matches!(err, DispatchError::ControlDir { .. }));
    }

    #[test]
    fn test_find_program_rejects_missing_path() {
        assert!(find_program("/definitely/not/here/ssh").is_none());
        assert!(find_program("").is_none());
    }
}
