//! Local session identity for reaction de-duplication.

use uuid::Uuid;

use crate::draft::{DraftStore, Drafts, SESSION_ID_KEY};

/// The persisted session identifier, minted and stored on first use.
///
/// If the store cannot persist it, the fresh identifier is still returned
/// and lives for this process only.
pub async fn session_identifier<S: DraftStore>(drafts: &Drafts<S>) -> String {
    let existing: Option<String> = drafts.read(SESSION_ID_KEY, None).await;
    if let Some(id) = existing.filter(|id| !id.trim().is_empty()) {
        return id;
    }
    let id = Uuid::new_v4().to_string();
    drafts.write(SESSION_ID_KEY, &id).await;
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::MemoryDraftStore;

    #[tokio::test]
    async fn test_session_identifier_is_stable() {
        let drafts = Drafts::new(MemoryDraftStore::new());
        let first = session_identifier(&drafts).await;
        let second = session_identifier(&drafts).await;
        assert_eq!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }
}
