use anyhow::{Context, Result};
use clap::Parser;
use hireboard::cli::{handle_command, Cli};
use hireboard::config::ConfigManager;
use hireboard::core::RedirectGuard;
use hireboard::AppContext;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigManager::load()?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_base_url(url);
    }

    // Initialize logging first
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file {}", config.log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(
        "hireboard starting against {} (statuses: {})",
        config.api_base_url,
        config.status_set.name()
    );

    let redirect = RedirectGuard::default().with_hook(Arc::new(|target: &str| {
        eprintln!(
            "Your session has ended. Log in again with `hireboard login` ({}).",
            target
        );
    }));

    let ctx = AppContext::new(&config, redirect)?;
    handle_command(&ctx, cli.command).await
}
