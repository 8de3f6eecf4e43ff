use thiserror::Error;

use crate::confession::ReactionType;
use crate::wizard::{FieldErrors, WizardStep};

/// Errors related to confession operations outside the wizard.
#[derive(Debug, Error)]
pub enum ConfessionError {
    #[error("confession not found")]
    NotFound,

    #[error("validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    #[error("enter at least one search criterion")]
    MissingSearchCriteria,

    #[error("this session already reacted with {0}")]
    AlreadyReacted(ReactionType),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors surfaced by the submission wizard.
///
/// None of these leave the wizard in a broken state: validation keeps the
/// current step, a network failure returns to the preview with the draft
/// intact.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    #[error("input for step '{got}' does not match current step '{expected}'")]
    StepMismatch { expected: WizardStep, got: WizardStep },

    #[error("cannot {action} while on step '{step}'")]
    InvalidState {
        step: WizardStep,
        action: &'static str,
    },

    #[error("a submission is already in flight")]
    AlreadySubmitting,

    #[error("{0}")]
    Network(String),
}

/// Errors from the optional message enhancer. All of them are non-fatal.
#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("enhancement is not configured")]
    Unavailable,

    #[error("enhancement timed out after {0}s")]
    Timeout(u64),

    #[error("enhancement failed: {0}")]
    Provider(String),

    #[error("enhancement returned no text")]
    EmptyResponse,

    #[error("enhancement returned an unusable {0}-character message")]
    Malformed(usize),
}

/// Errors from repository operations (used by trait definitions in lovenote-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("message".to_string(), "too short".to_string());
        errors.insert("mood".to_string(), "unknown".to_string());
        let err = WizardError::Validation(errors);
        assert_eq!(err.to_string(), "validation failed: message: too short; mood: unknown");
    }

    #[test]
    fn test_step_mismatch_display() {
        let err = WizardError::StepMismatch {
            expected: WizardStep::Identity,
            got: WizardStep::Message,
        };
        assert!(err.to_string().contains("'message'"));
        assert!(err.to_string().contains("'identity'"));
    }

    #[test]
    fn test_network_error_is_verbatim() {
        let err = WizardError::Network("query error: disk full".to_string());
        assert_eq!(err.to_string(), "query error: disk full");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
