//! Per-step validation.
//!
//! Each step has a pure `validate_*` function that either yields the
//! normalized, typed fields for that step or a per-field error map. Nothing
//! is merged into the draft unless the whole step validates.

use std::sync::LazyLock;

use regex::Regex;

use lovenote_types::confession::{Mood, YearOrBatch};
use lovenote_types::draft::{AffiliationFields, ConfessionDraft, IdentityFields, MessageFields};
use lovenote_types::wizard::{FieldErrors, StepInput, StepValidation};
use lovenote_types::{
    MAX_ADDITIONAL_MESSAGE_LENGTH, MAX_HINT_LENGTH, MAX_MESSAGE_LENGTH, MIN_MESSAGE_LENGTH,
};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

const MIN_NAME_LENGTH: usize = 2;
const PHONE_DIGITS: usize = 10;

/// Step 1 after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMessage {
    pub message: String,
    pub mood: Option<Mood>,
    pub song_link: Option<String>,
}

/// Step 2 after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAffiliation {
    pub college_name: String,
    pub department: String,
    pub year_or_batch: YearOrBatch,
    pub section: Option<String>,
    pub recipient_hint: Option<String>,
}

/// Step 3 after validation. Sender fields are already `None` when anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidIdentity {
    pub is_anonymous: bool,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub sender_phone: Option<String>,
    pub sender_section: Option<String>,
    pub additional_message: Option<String>,
}

/// Validated fields of any one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidStep {
    Message(ValidMessage),
    Affiliation(ValidAffiliation),
    Identity(ValidIdentity),
}

impl ValidMessage {
    /// A fresh message discards any earlier enhancement.
    pub fn merge_into(self, draft: &mut ConfessionDraft) {
        draft.message = Some(self.message);
        draft.mood = self.mood;
        draft.song_link = self.song_link;
        draft.original_message = None;
    }
}

impl ValidAffiliation {
    pub fn merge_into(self, draft: &mut ConfessionDraft) {
        draft.college_name = Some(self.college_name);
        draft.department = Some(self.department);
        draft.year_or_batch = Some(self.year_or_batch);
        draft.section = self.section;
        draft.recipient_hint = self.recipient_hint;
    }
}

impl ValidIdentity {
    pub fn merge_into(self, draft: &mut ConfessionDraft) {
        draft.is_anonymous = self.is_anonymous;
        draft.sender_name = self.sender_name;
        draft.sender_email = self.sender_email;
        draft.sender_phone = self.sender_phone;
        draft.sender_section = self.sender_section;
        draft.additional_message = self.additional_message;
    }
}

impl ValidStep {
    pub fn merge_into(self, draft: &mut ConfessionDraft) {
        match self {
            ValidStep::Message(v) => v.merge_into(draft),
            ValidStep::Affiliation(v) => v.merge_into(draft),
            ValidStep::Identity(v) => v.merge_into(draft),
        }
    }
}

/// Validate whichever step `input` belongs to.
pub fn validate(input: &StepInput) -> Result<ValidStep, FieldErrors> {
    match input {
        StepInput::Message(f) => validate_message(f).map(ValidStep::Message),
        StepInput::Affiliation(f) => validate_affiliation(f).map(ValidStep::Affiliation),
        StepInput::Identity(f) => validate_identity(f).map(ValidStep::Identity),
    }
}

/// Validation outcome without the typed fields, for form feedback.
pub fn check(input: &StepInput) -> StepValidation {
    match validate(input) {
        Ok(_) => StepValidation::from_errors(FieldErrors::new()),
        Err(errors) => StepValidation::from_errors(errors),
    }
}

pub fn validate_message(fields: &MessageFields) -> Result<ValidMessage, FieldErrors> {
    let mut errors = FieldErrors::new();

    let message = fields.message.trim();
    let length = message.chars().count();
    if length < MIN_MESSAGE_LENGTH {
        errors.insert(
            "message".into(),
            format!("Your message should be at least {MIN_MESSAGE_LENGTH} characters"),
        );
    } else if length > MAX_MESSAGE_LENGTH {
        errors.insert(
            "message".into(),
            format!("Message is too long (max {MAX_MESSAGE_LENGTH} characters)"),
        );
    }

    let mood = match non_empty(&fields.mood) {
        None => None,
        Some(raw) => match raw.parse::<Mood>() {
            Ok(mood) => Some(mood),
            Err(_) => {
                errors.insert(
                    "mood".into(),
                    "Please pick one of: sweet, nervous, bold, shy".into(),
                );
                None
            }
        },
    };

    let song_link = non_empty(&fields.song_link);
    if let Some(link) = &song_link {
        if url::Url::parse(link).is_err() {
            errors.insert("song_link".into(), "Please enter a valid URL".into());
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ValidMessage {
        message: message.to_string(),
        mood,
        song_link,
    })
}

pub fn validate_affiliation(fields: &AffiliationFields) -> Result<ValidAffiliation, FieldErrors> {
    let mut errors = FieldErrors::new();

    let college_name = fields.college_name.trim();
    if college_name.chars().count() < MIN_NAME_LENGTH {
        errors.insert("college_name".into(), "Please enter your college name".into());
    }

    let department = fields.department.trim();
    if department.chars().count() < MIN_NAME_LENGTH {
        errors.insert("department".into(), "Please enter your department".into());
    }

    let year_raw = fields.year_or_batch.trim();
    let year_or_batch = if year_raw.is_empty() {
        errors.insert("year_or_batch".into(), "Please select your year/batch".into());
        None
    } else {
        match year_raw.parse::<YearOrBatch>() {
            Ok(year) => Some(year),
            Err(_) => {
                errors.insert(
                    "year_or_batch".into(),
                    "Please select a valid year/batch".into(),
                );
                None
            }
        }
    };

    let recipient_hint = non_empty(&fields.recipient_hint);
    if recipient_hint
        .as_ref()
        .is_some_and(|h| h.chars().count() > MAX_HINT_LENGTH)
    {
        errors.insert(
            "recipient_hint".into(),
            format!("Hint is too long (max {MAX_HINT_LENGTH} characters)"),
        );
    }

    match year_or_batch {
        Some(year_or_batch) if errors.is_empty() => Ok(ValidAffiliation {
            college_name: college_name.to_string(),
            department: department.to_string(),
            year_or_batch,
            section: non_empty(&fields.section),
            recipient_hint,
        }),
        _ => Err(errors),
    }
}

pub fn validate_identity(fields: &IdentityFields) -> Result<ValidIdentity, FieldErrors> {
    let mut errors = FieldErrors::new();

    let sender_name = non_empty(&fields.sender_name);
    if !fields.is_anonymous && sender_name.is_none() {
        errors.insert(
            "sender_name".into(),
            "Please enter your name or choose to remain anonymous".into(),
        );
    }

    let sender_email = non_empty(&fields.sender_email);
    if sender_email.as_ref().is_some_and(|e| !EMAIL_RE.is_match(e)) {
        errors.insert("sender_email".into(), "Please enter a valid email".into());
    }

    let sender_phone = non_empty(&fields.sender_phone);
    if sender_phone.as_ref().is_some_and(|p| !is_phone_number(p)) {
        errors.insert(
            "sender_phone".into(),
            "Please enter a valid 10-digit phone number".into(),
        );
    }

    let additional_message = non_empty(&fields.additional_message);
    if additional_message
        .as_ref()
        .is_some_and(|m| m.chars().count() > MAX_ADDITIONAL_MESSAGE_LENGTH)
    {
        errors.insert(
            "additional_message".into(),
            format!("Additional message is too long (max {MAX_ADDITIONAL_MESSAGE_LENGTH} characters)"),
        );
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    if fields.is_anonymous {
        return Ok(ValidIdentity {
            is_anonymous: true,
            sender_name: None,
            sender_email: None,
            sender_phone: None,
            sender_section: None,
            additional_message: None,
        });
    }

    Ok(ValidIdentity {
        is_anonymous: false,
        sender_name,
        sender_email,
        sender_phone,
        sender_section: non_empty(&fields.sender_section),
        additional_message,
    })
}

/// Trimmed value, or `None` for absent and blank input.
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn is_phone_number(value: &str) -> bool {
    value.len() == PHONE_DIGITS && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> MessageFields {
        MessageFields {
            message: text.to_string(),
            ..Default::default()
        }
    }

    fn affiliation() -> AffiliationFields {
        AffiliationFields {
            college_name: "MIT".to_string(),
            department: "CS".to_string(),
            year_or_batch: "3rd Year".to_string(),
            section: Some("".to_string()),
            recipient_hint: None,
        }
    }

    #[test]
    fn test_message_length_bounds() {
        assert!(validate_message(&message("Ten chars!")).is_ok());
        let errors = validate_message(&message("too short")).unwrap_err();
        assert_eq!(
            errors["message"],
            "Your message should be at least 10 characters"
        );
        let long = "x".repeat(1001);
        let errors = validate_message(&message(&long)).unwrap_err();
        assert!(errors["message"].contains("max 1000"));
        assert!(validate_message(&message(&"x".repeat(1000))).is_ok());
    }

    #[test]
    fn test_message_counts_characters_not_bytes() {
        // 10 hearts are 10 chars but 30+ bytes
        assert!(validate_message(&message(&"♥".repeat(10))).is_ok());
        assert!(validate_message(&message(&"é".repeat(1000))).is_ok());
    }

    #[test]
    fn test_message_is_trimmed() {
        let valid = validate_message(&message("   Ten characters!  ")).unwrap();
        assert_eq!(valid.message, "Ten characters!");
        assert!(validate_message(&message("      short     ")).is_err());
    }

    #[test]
    fn test_mood_and_song_link() {
        let fields = MessageFields {
            message: "Ten characters!".to_string(),
            mood: Some("Shy".to_string()),
            song_link: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
        };
        let valid = validate_message(&fields).unwrap();
        assert_eq!(valid.mood, Some(Mood::Shy));

        let fields = MessageFields {
            message: "Ten characters!".to_string(),
            mood: Some("angry".to_string()),
            song_link: Some("not a url".to_string()),
        };
        let errors = validate_message(&fields).unwrap_err();
        assert!(errors.contains_key("mood"));
        assert_eq!(errors["song_link"], "Please enter a valid URL");
    }

    #[test]
    fn test_empty_optional_fields_are_absent() {
        let fields = MessageFields {
            message: "Ten characters!".to_string(),
            mood: Some(String::new()),
            song_link: Some("  ".to_string()),
        };
        let valid = validate_message(&fields).unwrap();
        assert_eq!(valid.mood, None);
        assert_eq!(valid.song_link, None);

        let valid = validate_affiliation(&affiliation()).unwrap();
        assert_eq!(valid.section, None);
    }

    #[test]
    fn test_affiliation_errors() {
        let fields = AffiliationFields {
            college_name: "M".to_string(),
            department: String::new(),
            year_or_batch: String::new(),
            section: None,
            recipient_hint: Some("h".repeat(201)),
        };
        let errors = validate_affiliation(&fields).unwrap_err();
        assert_eq!(errors["college_name"], "Please enter your college name");
        assert_eq!(errors["department"], "Please enter your department");
        assert_eq!(errors["year_or_batch"], "Please select your year/batch");
        assert!(errors["recipient_hint"].contains("max 200"));
    }

    #[test]
    fn test_affiliation_rejects_unknown_year() {
        let mut fields = affiliation();
        fields.year_or_batch = "7th Year".to_string();
        let errors = validate_affiliation(&fields).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("year_or_batch"));
    }

    #[test]
    fn test_identity_requires_name_when_attributed() {
        let fields = IdentityFields {
            is_anonymous: false,
            sender_name: Some("".to_string()),
            ..Default::default()
        };
        let errors = validate_identity(&fields).unwrap_err();
        assert_eq!(
            errors["sender_name"],
            "Please enter your name or choose to remain anonymous"
        );
    }

    #[test]
    fn test_identity_contact_formats() {
        let fields = IdentityFields {
            is_anonymous: false,
            sender_name: Some("Kai".to_string()),
            sender_email: Some("kai@campus".to_string()),
            sender_phone: Some("12345".to_string()),
            ..Default::default()
        };
        let errors = validate_identity(&fields).unwrap_err();
        assert!(errors.contains_key("sender_email"));
        assert!(errors.contains_key("sender_phone"));

        let fields = IdentityFields {
            is_anonymous: false,
            sender_name: Some("Kai".to_string()),
            sender_email: Some("kai@campus.edu".to_string()),
            sender_phone: Some("9876543210".to_string()),
            ..Default::default()
        };
        assert!(validate_identity(&fields).is_ok());
    }

    #[test]
    fn test_phone_must_be_ascii_digits() {
        assert!(is_phone_number("0123456789"));
        assert!(!is_phone_number("012345678"));
        assert!(!is_phone_number("٠١٢٣٤٥٦٧٨٩"));
        assert!(!is_phone_number("01234-6789"));
    }

    #[test]
    fn test_anonymous_identity_drops_sender_fields() {
        let fields = IdentityFields {
            is_anonymous: true,
            sender_name: Some("Kai".to_string()),
            sender_email: Some("kai@campus.edu".to_string()),
            sender_phone: Some("9876543210".to_string()),
            sender_section: Some("B".to_string()),
            additional_message: Some("hi".to_string()),
        };
        let valid = validate_identity(&fields).unwrap();
        assert!(valid.is_anonymous);
        assert_eq!(valid.sender_name, None);
        assert_eq!(valid.sender_email, None);
        assert_eq!(valid.sender_phone, None);
        assert_eq!(valid.sender_section, None);
        assert_eq!(valid.additional_message, None);
    }

    #[test]
    fn test_check_reports_validity() {
        let ok = check(&StepInput::Affiliation(affiliation()));
        assert!(ok.valid);
        assert!(ok.errors.is_empty());

        let bad = check(&StepInput::Message(message("short")));
        assert!(!bad.valid);
        assert!(bad.errors.contains_key("message"));
    }

    #[test]
    fn test_message_merge_clears_enhancement() {
        let mut draft = ConfessionDraft {
            message: Some("enhanced".to_string()),
            original_message: Some("mine".to_string()),
            ..Default::default()
        };
        validate_message(&message("A fresh message"))
            .unwrap()
            .merge_into(&mut draft);
        assert_eq!(draft.message.as_deref(), Some("A fresh message"));
        assert_eq!(draft.original_message, None);
    }
}
