use crate::cli::ServeArgs;
use crate::infra::{build_catalog_source, AppState};
use crate::routes::with_triage_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use guia_saude::config::AppConfig;
use guia_saude::error::AppError;
use guia_saude::telemetry;
use guia_saude::workflows::triage::TriageService;
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

    let source = Arc::new(build_catalog_source(&config.catalog));
    let triage_service = Arc::new(
        TriageService::new(source, config.triage)
            .with_degraded_retry(config.catalog.degraded_retry),
    );

    let app = with_triage_routes(triage_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        catalog = %config.catalog.base_url,
        policy = %config.catalog.failure_policy,
        "guia saude triage service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
