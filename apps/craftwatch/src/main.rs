//! craftwatch entry point.

mod app;
mod config;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "craftwatch")]
#[command(about = "Tail a Minecraft server log and post notable events to a webhook")]
#[command(version)]
struct Cli {
    /// Server log file to follow (e.g. logs/latest.log)
    log_file: PathBuf,

    /// Webhook URL notifications are posted to
    webhook_url: String,

    /// TOML config file
    #[arg(long, short)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the echoed log lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting craftwatch");

    let config = config::Config::load(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(cli.log_file, cli.webhook_url, config))?;

    tracing::info!("craftwatch shut down cleanly");
    Ok(())
}
