use crate::assessment::{AssessmentServiceError, CaseStoreError, ProfileRegistryError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    CaseData(CaseStoreError),
    Profiles(ProfileRegistryError),
    Assessment(AssessmentServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::CaseData(err) => write!(f, "case data error: {}", err),
            AppError::Profiles(err) => write!(f, "profile registry error: {}", err),
            AppError::Assessment(err) => write!(f, "assessment error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::CaseData(err) => Some(err),
            AppError::Profiles(err) => Some(err),
            AppError::Assessment(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Assessment(AssessmentServiceError::StoreNotLoaded) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Assessment(AssessmentServiceError::NoMatch)
            | AppError::Assessment(AssessmentServiceError::Profile(
                ProfileRegistryError::NotFound(_),
            ))
            | AppError::Profiles(ProfileRegistryError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::CaseData(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Profiles(_)
            | AppError::Assessment(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CaseStoreError> for AppError {
    fn from(value: CaseStoreError) -> Self {
        Self::CaseData(value)
    }
}

impl From<ProfileRegistryError> for AppError {
    fn from(value: ProfileRegistryError) -> Self {
        Self::Profiles(value)
    }
}

impl From<AssessmentServiceError> for AppError {
    fn from(value: AssessmentServiceError) -> Self {
        Self::Assessment(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_loaded_maps_to_service_unavailable() {
        let response = AppError::from(AssessmentServiceError::StoreNotLoaded).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn unknown_profile_maps_to_not_found() {
        let error = ProfileRegistryError::NotFound("REF-0404".to_string());
        let response = AppError::from(error).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
