//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use lovenote_types::error::{ConfessionError, WizardError};
use lovenote_types::wizard::FieldErrors;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Confession service errors.
    Confession(ConfessionError),
    /// Submission wizard errors.
    Wizard(WizardError),
    /// Unknown wizard id.
    WizardNotFound,
    /// Authentication failure.
    Unauthorized(String),
    /// Malformed request input.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ConfessionError> for AppError {
    fn from(e: ConfessionError) -> Self {
        AppError::Confession(e)
    }
}

impl From<WizardError> for AppError {
    fn from(e: WizardError) -> Self {
        AppError::Wizard(e)
    }
}

fn field_details(errors: &FieldErrors) -> Option<serde_json::Value> {
    serde_json::to_value(errors).ok()
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<serde_json::Value>) {
        match self {
            AppError::Confession(ConfessionError::NotFound) => (
                StatusCode::NOT_FOUND,
                "CONFESSION_NOT_FOUND",
                "Confession not found".to_string(),
                None,
            ),
            AppError::Confession(ConfessionError::Validation(errors))
            | AppError::Wizard(WizardError::Validation(errors)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Some fields need another look".to_string(),
                field_details(errors),
            ),
            AppError::Confession(e @ ConfessionError::MissingSearchCriteria) => (
                StatusCode::BAD_REQUEST,
                "MISSING_SEARCH_CRITERIA",
                e.to_string(),
                None,
            ),
            AppError::Confession(e @ ConfessionError::AlreadyReacted(_)) => {
                (StatusCode::CONFLICT, "ALREADY_REACTED", e.to_string(), None)
            }
            AppError::Confession(e @ ConfessionError::StorageError(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
                None,
            ),
            AppError::Wizard(e @ WizardError::StepMismatch { .. }) => {
                (StatusCode::CONFLICT, "STEP_MISMATCH", e.to_string(), None)
            }
            AppError::Wizard(e @ WizardError::InvalidState { .. }) => {
                (StatusCode::CONFLICT, "INVALID_STATE", e.to_string(), None)
            }
            AppError::Wizard(e @ WizardError::AlreadySubmitting) => {
                (StatusCode::CONFLICT, "ALREADY_SUBMITTING", e.to_string(), None)
            }
            AppError::Wizard(e @ WizardError::Network(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SUBMISSION_FAILED",
                e.to_string(),
                None,
            ),
            AppError::WizardNotFound => (
                StatusCode::NOT_FOUND,
                "WIZARD_NOT_FOUND",
                "Wizard not found or already finished".to_string(),
                None,
            ),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
                None,
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();
        if status.is_server_error() {
            tracing::warn!(%status, code, %message, "request failed");
        }

        let body = serde_json::to_string(&ApiResponse::error(code, &message, details))
            .unwrap_or_else(|_| {
                r#"{"errors":[{"code":"SERIALIZATION_ERROR","message":"Failed to serialize response"}]}"#
                    .to_string()
            });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lovenote_types::confession::ReactionType;
    use lovenote_types::wizard::WizardStep;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Confession(ConfessionError::NotFound), StatusCode::NOT_FOUND),
            (
                AppError::Confession(ConfessionError::AlreadyReacted(ReactionType::Hearts)),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Wizard(WizardError::StepMismatch {
                    expected: WizardStep::Message,
                    got: WizardStep::Identity,
                }),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Wizard(WizardError::Network("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::WizardNotFound, StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(err.parts().0, status);
        }
    }

    #[test]
    fn test_validation_carries_field_details() {
        let mut errors = FieldErrors::new();
        errors.insert("message".into(), "Message must be at least 10 characters".into());
        let (status, code, _, details) = AppError::Wizard(WizardError::Validation(errors)).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(
            details.unwrap()["message"],
            "Message must be at least 10 characters"
        );
    }
}
