//! Submission wizard states, step input and validation results.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::draft::{AffiliationFields, IdentityFields, MessageFields};

/// Where the wizard currently is.
///
/// The four form steps are numbered 1-4. `Submitting` is entered while the
/// create call is in flight; `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Message,
    Affiliation,
    Identity,
    Preview,
    Submitting,
    Submitted,
}

impl WizardStep {
    pub const TOTAL_STEPS: u8 = 4;

    /// 1-based step number for progress indicators. `Submitting` and
    /// `Submitted` report as the last step.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Message => 1,
            WizardStep::Affiliation => 2,
            WizardStep::Identity => 3,
            WizardStep::Preview | WizardStep::Submitting | WizardStep::Submitted => 4,
        }
    }

    /// Next form step, or `None` past the identity step.
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Message => Some(WizardStep::Affiliation),
            WizardStep::Affiliation => Some(WizardStep::Identity),
            WizardStep::Identity => Some(WizardStep::Preview),
            _ => None,
        }
    }

    /// Previous form step, or `None` on the first step and after submission started.
    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Affiliation => Some(WizardStep::Message),
            WizardStep::Identity => Some(WizardStep::Affiliation),
            WizardStep::Preview => Some(WizardStep::Identity),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Message => "Your message",
            WizardStep::Affiliation => "College details",
            WizardStep::Identity => "About you",
            WizardStep::Preview => "Preview",
            WizardStep::Submitting => "Sending",
            WizardStep::Submitted => "Sent",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardStep::Message => write!(f, "message"),
            WizardStep::Affiliation => write!(f, "affiliation"),
            WizardStep::Identity => write!(f, "identity"),
            WizardStep::Preview => write!(f, "preview"),
            WizardStep::Submitting => write!(f, "submitting"),
            WizardStep::Submitted => write!(f, "submitted"),
        }
    }
}

/// Form input for the step being advanced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepInput {
    Message(MessageFields),
    Affiliation(AffiliationFields),
    Identity(IdentityFields),
}

impl StepInput {
    /// The step this input belongs to.
    pub fn step(&self) -> WizardStep {
        match self {
            StepInput::Message(_) => WizardStep::Message,
            StepInput::Affiliation(_) => WizardStep::Affiliation,
            StepInput::Identity(_) => WizardStep::Identity,
        }
    }
}

/// Per-field error messages keyed by field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Result of checking one step's fields against its schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepValidation {
    pub valid: bool,
    pub errors: FieldErrors,
}

impl StepValidation {
    pub fn from_errors(errors: FieldErrors) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// A non-fatal message for the user (e.g. enhancement unavailable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Navigation the UI should perform after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub path: String,
    /// Delay before navigating, leaving time for the celebration effect.
    #[serde(with = "duration_ms")]
    pub after: Duration,
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_navigation() {
        assert_eq!(WizardStep::Message.next(), Some(WizardStep::Affiliation));
        assert_eq!(WizardStep::Identity.next(), Some(WizardStep::Preview));
        assert_eq!(WizardStep::Preview.next(), None);
        assert_eq!(WizardStep::Message.previous(), None);
        assert_eq!(WizardStep::Preview.previous(), Some(WizardStep::Identity));
        assert_eq!(WizardStep::Submitted.previous(), None);
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(WizardStep::Message.number(), 1);
        assert_eq!(WizardStep::Preview.number(), WizardStep::TOTAL_STEPS);
        assert_eq!(WizardStep::Submitted.number(), 4);
    }

    #[test]
    fn test_step_input_tagged_json() {
        let input: StepInput = serde_json::from_str(
            r#"{"step":"identity","is_anonymous":false,"sender_name":"Kai"}"#,
        )
        .unwrap();
        assert_eq!(input.step(), WizardStep::Identity);
        match input {
            StepInput::Identity(fields) => {
                assert!(!fields.is_anonymous);
                assert_eq!(fields.sender_name.as_deref(), Some("Kai"));
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn test_redirect_serializes_millis() {
        let redirect = Redirect {
            path: "/confession/ABCDEFGH".to_string(),
            after: Duration::from_secs(2),
        };
        let json = serde_json::to_value(&redirect).unwrap();
        assert_eq!(json["after"], 2000);
    }
}
