//! services/client/src/bin/code_explainer.rs

use clap::Parser;
use client_lib::{
    adapters::HttpBackend,
    browse::run_browse,
    cli::{Cli, Command},
    commands::{self, Services},
    config::{validate_base_url, Config},
    error::ClientError,
    terminal::TerminalNotifier,
};
use code_explainer_core::ports::{CodeService, HistoryService, Notifier};
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.base_url {
        validate_base_url(&base_url)?;
        config.api_base_url = base_url;
    }
    if let Some(level) = cli.log_level {
        config.log_level = Level::from(level);
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }

    // Logs go to stderr so command output on stdout stays pipeable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    debug!("Configuration loaded: {:?}", config);

    // --- 2. Initialize the Backend Adapter ---
    let backend = Arc::new(HttpBackend::new(
        &config.api_base_url,
        config.request_timeout,
    )?);
    let history: Arc<dyn HistoryService> = backend.clone();
    let code: Arc<dyn CodeService> = backend;
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);

    let services = Services {
        history,
        code,
        notifier,
        page_size: config.page_size,
    };

    // --- 3. Dispatch ---
    match cli.command {
        Command::Languages => commands::run_languages(&services).await,
        Command::Levels => commands::run_levels(&services).await,
        Command::Health => commands::run_health(&services).await,
        Command::Explain(args) => commands::run_explain(&services, args).await,
        Command::History(args) => commands::run_history(&services, args).await,
        Command::Show { id } => commands::run_show(&services, id).await,
        Command::Favorite { id, off } => commands::run_favorite(&services, id, !off).await,
        Command::Delete { id, yes } => commands::run_delete(&services, id, yes).await,
        Command::Stats => commands::run_stats(&services).await,
        Command::Browse => {
            run_browse(
                services.history,
                services.code,
                services.notifier,
                &config,
            )
            .await
        }
    }
}
