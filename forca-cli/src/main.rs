use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use forca_cli::commands::{already_reported, Cli};

fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose. Logs go to stderr so
    // they never mix with command output or the dashboard.
    let default_level = if cli.verbose() { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Initialize tokio runtime
    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { cli.execute().await });

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Already printed inline
        Err(e) if already_reported(&e) => {
            tracing::debug!("Command failed: {:#}", e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e),
    }
}
