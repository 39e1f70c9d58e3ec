use crate::cli::ServeArgs;
use crate::infra::{spawn_case_store_load, AppState};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use empathia::assessment::{AssessmentService, ProfileRegistry};
use empathia::config::AppConfig;
use empathia::error::AppError;
use empathia::telemetry;
use std::sync::atomic::AtomicBool;
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

    let profiles = ProfileRegistry::embedded()?;
    info!(profiles = profiles.len(), "loaded refugee profiles");
    let service = Arc::new(AssessmentService::new(profiles));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        service: Arc::clone(&service),
    };

    spawn_case_store_load(
        Arc::clone(&service),
        config.data.cases_path.clone(),
        readiness_flag,
    );

    let app = with_assessment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(?config.environment, %addr, "empathia assessment service listening");

    axum::serve(listener, app).await?;
    Ok(())
}
