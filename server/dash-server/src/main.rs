//! Development API server for the analytics dashboard
//!
//! Serves the dashboard config, metrics, table and chart endpoints over an
//! in-memory dataset (CSV file, or generated sample sales).

mod config;
mod data;
mod mock;
mod routes;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::data::Dataset;
use crate::mock::{SalesGenerator, DEFAULT_SEED};
use crate::routes::AppState;

const DEFAULT_ADDR: &str = "0.0.0.0:8509";
const DEFAULT_CONFIG_PATH: &str = "config/dashboard.yml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dash_server=info,tower_http=info")),
        )
        .init();

    let config = load_config()?;
    let data = load_data(&config)?;
    tracing::info!(
        "Dashboard '{}': {} metrics, {} charts, {} rows x {} columns",
        config.title.as_deref().unwrap_or("untitled"),
        config.metrics.len(),
        config.charts.len(),
        data.len(),
        data.columns().len()
    );

    let static_dir = env::var("DASHBOARD_STATIC_DIR").ok().map(PathBuf::from);
    let app = routes::app(AppState::new(config, data), static_dir.as_deref());

    let addr = env::var("DASHBOARD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Dashboard API listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// `DASHBOARD_CONFIG_PATH` must exist when set; otherwise the default path
/// is tried before falling back to the bundled sample config.
fn load_config() -> anyhow::Result<ServerConfig> {
    if let Ok(path) = env::var("DASHBOARD_CONFIG_PATH") {
        return ServerConfig::load(Path::new(&path))
            .with_context(|| format!("Loading dashboard config from {}", path));
    }

    let default = Path::new(DEFAULT_CONFIG_PATH);
    if default.exists() {
        return ServerConfig::load(default).context("Loading default dashboard config");
    }

    tracing::info!("No dashboard config found, using bundled sample config");
    Ok(ServerConfig::sample()?)
}

fn load_data(config: &ServerConfig) -> anyhow::Result<Dataset> {
    let source = env::var("DASHBOARD_DATA_PATH").ok().or_else(|| config.data_source.clone());

    let dataset = match source {
        Some(path) if Path::new(&path).exists() => Dataset::load(Path::new(&path))
            .with_context(|| format!("Loading data from {}", path))?,
        Some(path) => {
            tracing::warn!("Data file {} not found, generating sample data", path);
            SalesGenerator::new(DEFAULT_SEED).generate()
        }
        None => SalesGenerator::new(DEFAULT_SEED).generate(),
    };

    Ok(dataset.with_date_column(config.date_column.clone()))
}
