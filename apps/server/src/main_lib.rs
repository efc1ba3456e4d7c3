use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use sitefolio_core::{
    evm::{EvmService, EvmServiceTrait},
    portfolio::{PortfolioService, PortfolioServiceTrait},
    records::{InMemoryRecordStore, RecordSet, RecordStoreTrait},
    settings::EvmSettings,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub evm_service: Arc<dyn EvmServiceTrait>,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub settings: EvmSettings,
    pub max_series_points: usize,
}

pub fn init_tracing() {
    let log_format = std::env::var("SF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `init` also routes the core crate's `log` records into this subscriber.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let record_set = load_record_set(&config.data_file).await?;
    let record_store = Arc::new(
        InMemoryRecordStore::from_record_set(record_set)
            .with_context(|| format!("Invalid records in {}", config.data_file.display()))?,
    );
    tracing::info!(
        "Serving {} projects from {}",
        record_store.list_project_ids()?.len(),
        config.data_file.display()
    );

    let evm_service: Arc<dyn EvmServiceTrait> = Arc::new(EvmService::new(
        record_store.clone(),
        config.evm.clone(),
    ));
    let portfolio_service: Arc<dyn PortfolioServiceTrait> =
        Arc::new(PortfolioService::new(record_store, evm_service.clone()));

    Ok(Arc::new(AppState {
        evm_service,
        portfolio_service,
        settings: config.evm.clone(),
        max_series_points: config.max_series_points,
    }))
}

/// Reads the seed record set. A missing file starts an empty store.
async fn load_record_set(path: &Path) -> anyhow::Result<RecordSet> {
    match tokio::fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse record set {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                "Record set {} not found, starting with an empty store",
                path.display()
            );
            Ok(RecordSet::default())
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read record set {}", path.display()))
        }
    }
}
