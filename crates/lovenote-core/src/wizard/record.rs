//! Mapping a finished draft to the persisted record.

use lovenote_types::confession::{Confession, ConfessionStatus, NewConfession};
use lovenote_types::draft::ConfessionDraft;
use lovenote_types::error::RepositoryError;
use lovenote_types::wizard::FieldErrors;

use crate::code::generate_retrieval_code;
use crate::repository::confession::ConfessionRepository;

/// Attempts at inserting with a freshly drawn code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 3;

/// Build the create payload from a draft that passed all three steps.
///
/// Submissions are approved immediately. Sender fields and the additional
/// message are dropped for anonymous drafts whatever the draft holds.
pub fn build_record(draft: &ConfessionDraft) -> Result<NewConfession, FieldErrors> {
    let mut missing = FieldErrors::new();
    if draft.message.is_none() {
        missing.insert("message".into(), "Please write your message first".into());
    }
    if draft.college_name.is_none() {
        missing.insert("college_name".into(), "Please enter your college name".into());
    }
    if draft.year_or_batch.is_none() {
        missing.insert("year_or_batch".into(), "Please select your year/batch".into());
    }
    let (Some(message), Some(college_name), Some(year_or_batch)) = (
        draft.message.clone(),
        draft.college_name.clone(),
        draft.year_or_batch,
    ) else {
        return Err(missing);
    };

    let attributed = |value: &Option<String>| {
        if draft.is_anonymous {
            None
        } else {
            value.clone()
        }
    };

    Ok(NewConfession {
        message,
        mood: draft.mood,
        song_link: draft.song_link.clone(),
        college_name,
        department: draft.department.clone(),
        year_or_batch,
        section: draft.section.clone(),
        recipient_hint: draft.recipient_hint.clone(),
        is_anonymous: draft.is_anonymous,
        sender_name: attributed(&draft.sender_name),
        sender_email: attributed(&draft.sender_email),
        sender_phone: attributed(&draft.sender_phone),
        sender_section: attributed(&draft.sender_section),
        additional_message: attributed(&draft.additional_message),
        unique_code: generate_retrieval_code(),
        status: ConfessionStatus::Approved,
    })
}

/// Insert `record`, drawing a new retrieval code if the store reports the
/// current one as taken.
pub async fn create_with_fresh_code<R: ConfessionRepository>(
    repo: &R,
    mut record: NewConfession,
) -> Result<Confession, RepositoryError> {
    let mut attempt = 1;
    loop {
        match repo.create(&record).await {
            Err(RepositoryError::Conflict(msg)) if attempt < MAX_CODE_ATTEMPTS => {
                tracing::warn!(attempt, code = %record.unique_code, %msg, "retrieval code taken, retrying");
                record.unique_code = generate_retrieval_code();
                attempt += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::RETRIEVAL_CODE_ALPHABET;
    use crate::testing::MemoryConfessionRepository;
    use lovenote_types::confession::{Mood, YearOrBatch};

    fn complete_draft(is_anonymous: bool) -> ConfessionDraft {
        ConfessionDraft {
            message: Some("Ten characters!".to_string()),
            mood: Some(Mood::Nervous),
            college_name: Some("MIT".to_string()),
            department: Some("CS".to_string()),
            year_or_batch: Some(YearOrBatch::Third),
            is_anonymous,
            sender_name: Some("Jo".to_string()),
            sender_email: Some("jo@mit.edu".to_string()),
            sender_phone: Some("9876543210".to_string()),
            sender_section: Some("A".to_string()),
            additional_message: Some("coffee?".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_anonymous_record_nulls_sender_fields() {
        let record = build_record(&complete_draft(true)).unwrap();
        assert!(record.is_anonymous);
        assert_eq!(record.sender_name, None);
        assert_eq!(record.sender_email, None);
        assert_eq!(record.sender_phone, None);
        assert_eq!(record.sender_section, None);
        assert_eq!(record.additional_message, None);
        assert_eq!(record.status, ConfessionStatus::Approved);
        assert_eq!(record.unique_code.len(), 8);
        assert!(record.unique_code.bytes().all(|b| RETRIEVAL_CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_attributed_record_keeps_sender_fields() {
        let record = build_record(&complete_draft(false)).unwrap();
        assert_eq!(record.sender_name.as_deref(), Some("Jo"));
        assert_eq!(record.additional_message.as_deref(), Some("coffee?"));
    }

    #[test]
    fn test_incomplete_draft_is_rejected() {
        let errors = build_record(&ConfessionDraft::default()).unwrap_err();
        assert!(errors.contains_key("message"));
        assert!(errors.contains_key("college_name"));
        assert!(errors.contains_key("year_or_batch"));
    }

    #[tokio::test]
    async fn test_code_collision_retries_with_new_code() {
        let repo = MemoryConfessionRepository::new();
        let first = repo
            .create(&build_record(&complete_draft(true)).unwrap())
            .await
            .unwrap();

        let mut clash = build_record(&complete_draft(true)).unwrap();
        clash.unique_code = first.unique_code.clone();
        let created = create_with_fresh_code(&repo, clash).await.unwrap();
        assert_ne!(created.unique_code, first.unique_code);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let repo = MemoryConfessionRepository::new();
        repo.fail_next_creates(1);
        let err = create_with_fresh_code(&repo, build_record(&complete_draft(true)).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
        assert_eq!(repo.len(), 0);
    }
}
