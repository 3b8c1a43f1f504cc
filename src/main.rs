use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use datalens::{config::Config, service::HttpAnalysisService, Workflow};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal client for the tabular analysis service
#[derive(Debug, Parser)]
#[command(name = "datalens", version, about)]
struct Cli {
    /// Analysis service base address (overrides DATALENS_API_BASE)
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Upload this file on start-up
    #[arg(long, short, value_name = "PATH")]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(base) = cli.api_base.as_deref() {
        config = config.with_base_url(base)?;
    }

    // The terminal belongs to the TUI, so logs go to a file
    std::fs::create_dir_all(&config.logging.dir)?;
    let appender = tracing_appender::rolling::never(&config.logging.dir, "datalens.log");
    let (writer, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    info!(api_base = %config.service.base_url, "Configuration loaded");

    let service = Arc::new(HttpAnalysisService::new(&config.service.base_url));
    let workflow = Workflow::new(service);

    datalens::tui::run(config, workflow, cli.file).await
}
