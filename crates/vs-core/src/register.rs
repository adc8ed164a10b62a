//! Reverse tunnel registration
//!
//! Installs a systemd user service that keeps an autossh reverse tunnel
//! open to a VPS, so this machine stays reachable on `<vps>:<remote_port>`.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use crate::session::find_program;

/// Unit name under `~/.config/systemd/user`
pub const SERVICE_NAME: &str = "vibestunnel";

/// Remote port used when none is entered
pub const DEFAULT_REMOTE_PORT: u16 = 2222;

/// Answers collected from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelParams {
    /// VPS hostname or address
    pub vps: String,
    /// Login on the VPS
    pub user: String,
    /// Port opened on the VPS and forwarded to local sshd
    pub remote_port: u16,
}

/// Render the systemd unit for `params`
pub fn render_service_unit(params: &TunnelParams) -> String {
    format!(
        r#"[Unit]
Description=vibessh reverse tunnel
After=network-online.target

[Service]
ExecStart=autossh -M 0 -o ServerAliveInterval=30 -o ServerAliveCountMax=3 \
  -o ExitOnForwardFailure=yes -N \
  -R {port}:localhost:22 {user}@{vps}
Restart=always

[Install]
WantedBy=default.target
"#,
        port = params.remote_port,
        user = params.user,
        vps = params.vps,
    )
}

/// Path of the unit file
pub fn service_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home
        .join(".config")
        .join("systemd")
        .join("user")
        .join(format!("{}.service", SERVICE_NAME)))
}

/// Ask for the tunnel parameters on `input`, echoing prompts to `output`
pub fn prompt_params<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<TunnelParams> {
    let vps = prompt(input, output, "VPS address (e.g. your-vps.com): ")?;
    if vps.is_empty() {
        anyhow::bail!("VPS address is required");
    }

    let local_user = whoami::username();
    let user = prompt(input, output, &format!("VPS user [{}]: ", local_user))?;
    let user = if user.is_empty() { local_user } else { user };

    let port = prompt(
        input,
        output,
        &format!("Remote port [{}]: ", DEFAULT_REMOTE_PORT),
    )?;
    let remote_port = if port.is_empty() {
        DEFAULT_REMOTE_PORT
    } else {
        port.parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .context("remote port must be a number between 1 and 65535")?
    };

    Ok(TunnelParams {
        vps,
        user,
        remote_port,
    })
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("read answer")?;
    Ok(line.trim().to_string())
}

/// Write the unit to `path`, creating its directory
pub fn write_service_unit(path: &Path, params: &TunnelParams) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("create systemd user dir {:?}", dir))?;
    }
    fs::write(path, render_service_unit(params))
        .with_context(|| format!("write service file {:?}", path))?;
    Ok(())
}

/// Run the interactive registration against stdin/stdout
pub fn run() -> Result<PathBuf> {
    if !cfg!(target_os = "linux") {
        anyhow::bail!(
            "--register is only supported on Linux (current OS: {})",
            std::env::consts::OS
        );
    }

    if find_program("autossh").is_none() {
        anyhow::bail!("autossh not found in PATH - install it first (e.g. sudo apt install autossh)");
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut stdout = std::io::stdout();
    let params = prompt_params(&mut input, &mut stdout)?;

    let path = service_path()?;
    write_service_unit(&path, &params)?;
    tracing::info!("Wrote {:?}", path);

    systemctl(&["--user", "daemon-reload"]).context("daemon-reload")?;
    systemctl(&["--user", "enable", "--now", SERVICE_NAME]).context("enable service")?;
    tracing::info!("Enabled {}.service", SERVICE_NAME);

    Ok(path)
}

fn systemctl(args: &[&str]) -> Result<()> {
    let status = Command::new("systemctl")
        .args(args)
        .status()
        .context("Failed to run systemctl")?;

    if !status.success() {
        anyhow::bail!("systemctl {} failed with status: {}", args.join(" "), status);
    }
    Ok(())
}
