use gigboard::config::AppConfig;
use gigboard::error::AppError;
use gigboard::market::{LedgerMarketplace, MarketError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the marketplace over the configured storage: persistent JSON
/// ledgers when a data directory is set, volatile in-memory ledgers
/// otherwise.
pub(crate) fn build_marketplace(config: &AppConfig) -> Result<LedgerMarketplace, AppError> {
    match &config.storage.data_dir {
        Some(dir) => LedgerMarketplace::open(dir)
            .map_err(|err| AppError::Market(MarketError::Store(err))),
        None => Ok(LedgerMarketplace::in_memory()),
    }
}
