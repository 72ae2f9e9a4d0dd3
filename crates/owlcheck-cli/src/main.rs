//! owlcheck CLI main entry point

use anyhow::Result;
use clap::Parser;
use owlcheck_cli::{Cli, CommandExecutor, Config};
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the command output
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default(cli.config.as_deref())?;
    let executor = CommandExecutor::new(config);
    let result = executor.execute(cli.command).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(result.output.as_bytes())?;
    stdout.flush()?;

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
