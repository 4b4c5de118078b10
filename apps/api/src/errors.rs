use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::draft::DraftError;
use crate::form::FormError;
use crate::generation::GenerationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Submission already in flight")]
    SubmissionInFlight,

    #[error("Document generation failed: {0}")]
    EndpointFailure(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::NoSuchEntry { .. } | FormError::UnknownEntry(_) => {
                AppError::NotFound(e.to_string())
            }
            FormError::UnknownField(_) | FormError::UnknownGroup(_) => {
                AppError::Validation(e.to_string())
            }
        }
    }
}

impl From<DraftError> for AppError {
    fn from(e: DraftError) -> Self {
        match e {
            DraftError::Form(e) => e.into(),
            DraftError::Storage(e) => AppError::Storage(e.to_string()),
            DraftError::Codec(e) => AppError::Internal(e.into()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::MissingRequired(_) => AppError::Validation(e.to_string()),
            GenerationError::InFlight => AppError::SubmissionInFlight,
            GenerationError::EndpointStatus { .. } => {
                AppError::EndpointFailure("Error generating PDF. Please try again.".to_string())
            }
            GenerationError::Transport(_) => AppError::EndpointFailure(
                "Network error. Please check your connection.".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::SubmissionInFlight => (
                StatusCode::CONFLICT,
                "SUBMISSION_IN_FLIGHT",
                "A document is already being generated".to_string(),
            ),
            AppError::EndpointFailure(msg) => {
                tracing::warn!("Endpoint failure: {msg}");
                (StatusCode::BAD_GATEWAY, "ENDPOINT_FAILURE", msg.clone())
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Group;

    #[test]
    fn test_form_errors_map_to_status() {
        let missing = AppError::from(FormError::NoSuchEntry {
            group: Group::Project,
            position: 4,
        });
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let unknown = AppError::from(FormError::UnknownField("salary".to_string()));
        assert_eq!(unknown.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_generation_errors_map_to_status() {
        let failed = AppError::from(GenerationError::EndpointStatus {
            status: 500,
            body: String::new(),
        });
        assert_eq!(failed.into_response().status(), StatusCode::BAD_GATEWAY);

        let busy = AppError::from(GenerationError::InFlight);
        assert_eq!(busy.into_response().status(), StatusCode::CONFLICT);

        let invalid = AppError::from(GenerationError::MissingRequired(vec!["name"]));
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
