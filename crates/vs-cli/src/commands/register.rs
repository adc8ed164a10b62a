//! `--register`: install the reverse tunnel service

use anyhow::Result;
use vs_core::register::{self, SERVICE_NAME};

use crate::output::{print_info, print_success, print_warning};

/// Run the registration prompts and report what was installed
///
/// # Returns
/// `Ok(())` once the service is enabled. Prompt, write and systemctl
/// failures come back as errors for `main` to print.
pub fn register_command() -> Result<()> {
    let path = register::run()?;

    print_success(&format!("Installed {}", path.display()));
    print_success(&format!("{}.service enabled and started", SERVICE_NAME));
    print_warning("The VPS sshd must allow remote forwards on all interfaces:");
    print_info("  add `GatewayPorts yes` to /etc/ssh/sshd_config and restart sshd");
    Ok(())
}
