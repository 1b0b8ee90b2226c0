use crate::cli::ServeArgs;
use crate::infra::{build_marketplace, AppState};
use crate::routes::with_market_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gigboard::config::AppConfig;
use gigboard::error::AppError;
use gigboard::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let storage = config
        .storage
        .data_dir
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "in-memory".to_string());
    let marketplace = Arc::new(build_marketplace(&config)?);

    let app = with_market_routes(marketplace)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, %storage, "freelance marketplace service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
