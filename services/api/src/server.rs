use crate::cli::ServeArgs;
use crate::infra::{build_store, AppState};
use crate::routes::with_import_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estate_hub::config::AppConfig;
use estate_hub::error::AppError;
use estate_hub::telemetry;
use estate_hub::workflows::import::PropertyImporter;
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

    let store = build_store(&config.store)?;
    let importer = Arc::new(PropertyImporter::new(store, config.import.chunk_size));

    let app = with_import_routes(importer)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        chunk_size = config.import.chunk_size,
        "listing import service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
