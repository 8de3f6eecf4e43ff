//! In-progress confession drafts and the raw per-step form input.
//!
//! A `ConfessionDraft` accumulates validated fields as the wizard advances.
//! The `*Fields` structs carry what the user typed for one step before
//! validation; every optional text field treats an empty string as absent.

use serde::{Deserialize, Serialize};

use crate::confession::{Mood, YearOrBatch};

/// Aggregate of everything the wizard has validated so far.
///
/// Serialized as JSON into the draft slot. Unknown or missing fields fall
/// back to defaults so older drafts still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfessionDraft {
    pub message: Option<String>,
    pub mood: Option<Mood>,
    pub song_link: Option<String>,
    pub college_name: Option<String>,
    pub department: Option<String>,
    pub year_or_batch: Option<YearOrBatch>,
    pub section: Option<String>,
    pub recipient_hint: Option<String>,
    pub is_anonymous: bool,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub sender_phone: Option<String>,
    pub sender_section: Option<String>,
    pub additional_message: Option<String>,
    /// The user's own text when the enhancer rewrote `message`.
    pub original_message: Option<String>,
}

impl Default for ConfessionDraft {
    fn default() -> Self {
        Self {
            message: None,
            mood: None,
            song_link: None,
            college_name: None,
            department: None,
            year_or_batch: None,
            section: None,
            recipient_hint: None,
            is_anonymous: true,
            sender_name: None,
            sender_email: None,
            sender_phone: None,
            sender_section: None,
            additional_message: None,
            original_message: None,
        }
    }
}

impl ConfessionDraft {
    /// Step 1 form pre-filled from the draft.
    pub fn message_fields(&self) -> MessageFields {
        MessageFields {
            message: self.message.clone().unwrap_or_default(),
            mood: self.mood.map(|m| m.to_string()),
            song_link: self.song_link.clone(),
        }
    }

    /// Step 2 form pre-filled from the draft.
    pub fn affiliation_fields(&self) -> AffiliationFields {
        AffiliationFields {
            college_name: self.college_name.clone().unwrap_or_default(),
            department: self.department.clone().unwrap_or_default(),
            year_or_batch: self
                .year_or_batch
                .map(|y| y.label().to_string())
                .unwrap_or_default(),
            section: self.section.clone(),
            recipient_hint: self.recipient_hint.clone(),
        }
    }

    /// Step 3 form pre-filled from the draft.
    pub fn identity_fields(&self) -> IdentityFields {
        IdentityFields {
            is_anonymous: self.is_anonymous,
            sender_name: self.sender_name.clone(),
            sender_email: self.sender_email.clone(),
            sender_phone: self.sender_phone.clone(),
            sender_section: self.sender_section.clone(),
            additional_message: self.additional_message.clone(),
        }
    }

    /// Whether nothing has been entered yet.
    pub fn is_blank(&self) -> bool {
        *self == ConfessionDraft::default()
    }
}

/// Raw Step 1 input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageFields {
    pub message: String,
    pub mood: Option<String>,
    pub song_link: Option<String>,
}

/// Raw Step 2 input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliationFields {
    pub college_name: String,
    pub department: String,
    pub year_or_batch: String,
    pub section: Option<String>,
    pub recipient_hint: Option<String>,
}

/// Raw Step 3 input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityFields {
    pub is_anonymous: bool,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub sender_phone: Option<String>,
    pub sender_section: Option<String>,
    pub additional_message: Option<String>,
}

impl Default for IdentityFields {
    fn default() -> Self {
        Self {
            is_anonymous: true,
            sender_name: None,
            sender_email: None,
            sender_phone: None,
            sender_section: None,
            additional_message: None,
        }
    }
}

/// A complete submission in one request body (all three steps' fields).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFields {
    #[serde(flatten)]
    pub message: MessageFields,
    #[serde(flatten)]
    pub affiliation: AffiliationFields,
    #[serde(flatten)]
    pub identity: IdentityFields,
}
