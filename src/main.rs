//! Payslip server entry point.
//!
//! Reads settings from the environment, initializes logging, loads the tax
//! tables and serves the HTTP API.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use payslip_engine::api::{AppState, create_router};
use payslip_engine::config::{ConfigLoader, ServerSettings};
use payslip_engine::usage::{FileUsageStore, InMemoryUsageStore, UsageStore};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = ServerSettings::from_env();

    init_logging(&settings.log_level);

    info!("Starting payslip-server v{}", env!("CARGO_PKG_VERSION"));

    let loader = match &settings.config_dir {
        Some(dir) => ConfigLoader::load(dir)
            .with_context(|| format!("loading tax tables from {}", dir.display()))?,
        None => ConfigLoader::builtin().context("loading embedded tax tables")?,
    };
    let years: Vec<&str> = loader
        .tables()
        .years()
        .map(|year| year.tax_year.as_str())
        .collect();
    info!(tax_years = ?years, "Tax tables loaded");

    let usage: Arc<dyn UsageStore> = match &settings.usage_file {
        Some(path) => Arc::new(
            FileUsageStore::open(path)
                .with_context(|| format!("opening usage store {}", path.display()))?,
        ),
        None => Arc::new(InMemoryUsageStore::new()),
    };

    let router = create_router(AppState::with_usage_store(loader.into_tables(), usage));

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, "Listening");

    axum::serve(listener, router).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
