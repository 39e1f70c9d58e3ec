use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use empathia::assessment::{assessment_router, AssessmentService, CaseSource};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_assessment_routes(service: Arc<AssessmentService>) -> axum::Router {
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let started = state.readiness.load(std::sync::atomic::Ordering::Acquire);
    let source = state.service.source();

    let (status, label) = match (&source, started) {
        (CaseSource::Ready(_), true) => (StatusCode::OK, "ready"),
        (CaseSource::Unavailable(_), true) => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "initializing"),
    };

    let payload = match &source {
        CaseSource::Unavailable(reason) => json!({
            "status": label,
            "case_data": source.label(),
            "reason": reason,
        }),
        _ => json!({ "status": label, "case_data": source.label() }),
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
