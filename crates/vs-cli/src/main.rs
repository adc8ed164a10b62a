//! vibessh CLI
//!
//! - `vibessh`: interactive node picker, then connect
//! - `vibessh <target>`: resolve a node name, DNS name or address and connect
//! - `vibessh --register`: install the reverse tunnel service

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vibessh::commands::{self, App};
use vibessh::output::print_error;

#[derive(Parser, Debug)]
#[command(name = "vibessh")]
#[command(author, version, about = "Pick a host and ssh into it over a shared connection")]
#[command(override_usage = "vibessh [OPTIONS] [TARGET]\n       vibessh --register")]
struct Cli {
    /// Node name prefix, DNS name prefix or address; unmatched targets go to ssh as-is
    #[arg(conflicts_with = "register")]
    target: Option<String>,

    /// Set up a reverse tunnel from this machine to a VPS
    #[arg(long)]
    register: bool,
}

/// Log to stderr at `warn`, or at whatever `RUST_LOG` asks for
fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.register {
        return commands::register_command();
    }

    let app = App::load()?;
    match cli.target {
        None => commands::pick_command(&app),
        Some(token) => match commands::connect_command(&app, &token)? {},
    }
}

fn main() -> ExitCode {
    // Usage errors exit 2 from here
    let cli = Cli::parse();
    init_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
