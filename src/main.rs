//! `manage`: start the web API or apply a SQL script.

use anyhow::{Context, Result};
use api_scaffold::cli::{Cli, Command};
use api_scaffold::{commands, logging, Settings};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("failed to load settings")?;
    let _sentry = logging::init_error_reporting(&settings).context("failed to initialise error reporting")?;
    logging::init(&settings).context("failed to initialise logging")?;
    let settings = Arc::new(settings);

    match cli.command {
        Command::StartWeb => {
            commands::start_web(settings).await.context("web server failed")?;
        }
        Command::ApplySql { file_path } => {
            tokio::select! {
                result = commands::apply_sql(&settings, &file_path) => {
                    let result = result.with_context(|| format!("failed to apply {}", file_path.display()))?;
                    println!("{:?}", result);
                }
                _ = tokio::signal::ctrl_c() => tracing::warn!("command stopped by user"),
            }
        }
    }
    Ok(())
}
