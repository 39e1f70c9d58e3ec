use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::CaseQuery;
use super::profiles::ProfileRegistryError;
use super::service::{AssessmentService, AssessmentServiceError};
use super::synthetic::SyntheticProfile;

/// Router builder exposing case assessments, the synthetic scorer and coded profiles.
pub fn assessment_router(service: Arc<AssessmentService>) -> Router {
    Router::new()
        .route("/api/v1/assessments", post(assess_handler))
        .route("/api/v1/assessments/options", get(options_handler))
        .route("/api/v1/assessments/summary", get(summary_handler))
        .route("/api/v1/assessments/synthetic", post(synthetic_handler))
        .route("/api/v1/profiles", get(profiles_handler))
        .route("/api/v1/profiles/:refugee_code", get(profile_handler))
        .route(
            "/api/v1/profiles/:refugee_code/assessment",
            get(profile_assessment_handler),
        )
        .with_state(service)
}

pub(crate) async fn assess_handler(
    State(service): State<Arc<AssessmentService>>,
    Json(query): Json<CaseQuery>,
) -> Response {
    match service.assess(&query) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn options_handler(State(service): State<Arc<AssessmentService>>) -> Response {
    match service.attribute_options() {
        Ok(options) => (StatusCode::OK, Json(options)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler(State(service): State<Arc<AssessmentService>>) -> Response {
    match service.summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn synthetic_handler(
    State(service): State<Arc<AssessmentService>>,
    Json(profile): Json<SyntheticProfile>,
) -> Response {
    let assessment = service.synthetic(&profile);
    (StatusCode::OK, Json(assessment)).into_response()
}

pub(crate) async fn profiles_handler(State(service): State<Arc<AssessmentService>>) -> Response {
    (StatusCode::OK, Json(service.profiles())).into_response()
}

pub(crate) async fn profile_handler(
    State(service): State<Arc<AssessmentService>>,
    Path(refugee_code): Path<String>,
) -> Response {
    match service.profile(&refugee_code) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_assessment_handler(
    State(service): State<Arc<AssessmentService>>,
    Path(refugee_code): Path<String>,
) -> Response {
    match service.profile_assessment(&refugee_code) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::StoreNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        AssessmentServiceError::NoMatch
        | AssessmentServiceError::Profile(ProfileRegistryError::NotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        AssessmentServiceError::Profile(ProfileRegistryError::Malformed(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
