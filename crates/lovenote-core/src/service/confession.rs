//! Confession service.
//!
//! Everything outside the wizard: one-shot submission, retrieval by code
//! with view counting, the public feed, detail search, reactions and
//! moderation.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lovenote_types::confession::{
    Confession, ConfessionId, ConfessionStatistics, ConfessionStatus, Reaction, ReactionCounts,
    ReactionType,
};
use lovenote_types::draft::{ConfessionDraft, SubmissionFields};
use lovenote_types::error::{ConfessionError, RepositoryError};
use lovenote_types::music::MusicEmbed;
use lovenote_types::wizard::FieldErrors;

use crate::code::{is_well_formed, normalize_code};
use crate::music::classify_music_link;
use crate::repository::confession::{ConfessionFilter, ConfessionRepository};
use crate::repository::reaction::ReactionRepository;
use crate::wizard::record::{build_record, create_with_fresh_code};
use crate::wizard::schema::{validate_affiliation, validate_identity, validate_message};

/// Default page size for the public feed.
pub const DEFAULT_FEED_LIMIT: i64 = 20;

/// Largest page the feed will return.
pub const MAX_FEED_LIMIT: i64 = 100;

/// A confession as shown on its own page.
#[derive(Debug, Clone, Serialize)]
pub struct ConfessionView {
    pub confession: Confession,
    pub reactions: ReactionCounts,
    /// Reaction types the requesting session already used.
    pub my_reactions: Vec<ReactionType>,
    pub music: Option<MusicEmbed>,
}

/// Detail search. Every set criterion must match (case-insensitive
/// substring); `name` matches the sender name or the recipient hint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub college: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub name: Option<String>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        [&self.college, &self.department, &self.year, &self.name]
            .into_iter()
            .all(|c| needle(c).is_none())
    }

    pub fn matches(&self, confession: &Confession) -> bool {
        let contains = |haystack: Option<&str>, wanted: &Option<String>| match needle(wanted) {
            None => true,
            Some(n) => haystack.is_some_and(|h| h.to_lowercase().contains(&n)),
        };

        contains(Some(confession.college_name.as_str()), &self.college)
            && contains(confession.department.as_deref(), &self.department)
            && contains(Some(confession.year_or_batch.label()), &self.year)
            && match needle(&self.name) {
                None => true,
                Some(n) => [&confession.sender_name, &confession.recipient_hint]
                    .into_iter()
                    .flatten()
                    .any(|v| v.to_lowercase().contains(&n)),
            }
    }
}

fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn storage(e: RepositoryError) -> ConfessionError {
    match e {
        RepositoryError::NotFound => ConfessionError::NotFound,
        other => ConfessionError::StorageError(other.to_string()),
    }
}

/// Service over the confession and reaction repositories.
pub struct ConfessionService<C: ConfessionRepository, R: ReactionRepository> {
    confessions: C,
    reactions: R,
}

impl<C: ConfessionRepository, R: ReactionRepository> ConfessionService<C, R> {
    pub fn new(confessions: C, reactions: R) -> Self {
        Self {
            confessions,
            reactions,
        }
    }

    /// The confession repository, for callers driving the wizard.
    pub fn repository(&self) -> &C {
        &self.confessions
    }

    /// Validate all three steps at once and persist.
    pub async fn submit(&self, fields: SubmissionFields) -> Result<Confession, ConfessionError> {
        let mut errors = FieldErrors::new();
        let message = validate_message(&fields.message).map_err(|e| errors.extend(e)).ok();
        let affiliation = validate_affiliation(&fields.affiliation)
            .map_err(|e| errors.extend(e))
            .ok();
        let identity = validate_identity(&fields.identity)
            .map_err(|e| errors.extend(e))
            .ok();

        let (Some(message), Some(affiliation), Some(identity)) = (message, affiliation, identity)
        else {
            return Err(ConfessionError::Validation(errors));
        };

        let mut draft = ConfessionDraft::default();
        message.merge_into(&mut draft);
        affiliation.merge_into(&mut draft);
        identity.merge_into(&mut draft);

        let record = build_record(&draft).map_err(ConfessionError::Validation)?;
        let confession = create_with_fresh_code(&self.confessions, record)
            .await
            .map_err(storage)?;
        tracing::info!(
            confession_id = %confession.id,
            code = %confession.unique_code,
            "confession submitted"
        );
        Ok(confession)
    }

    /// Fetch a confession by retrieval code and count the view.
    ///
    /// `Ok(None)` for an unknown or malformed code; nothing is counted then. A failed
    /// view increment is logged and does not fail the fetch.
    pub async fn find_by_code(
        &self,
        code: &str,
        session: Option<&str>,
    ) -> Result<Option<ConfessionView>, ConfessionError> {
        let code = normalize_code(code);
        if !is_well_formed(&code) {
            tracing::debug!(code = %code, "malformed retrieval code");
            return Ok(None);
        }

        let Some(mut confession) = self
            .confessions
            .get_by_code(&code)
            .await
            .map_err(storage)?
        else {
            return Ok(None);
        };

        match self.confessions.increment_views(&confession.id).await {
            Ok(()) => confession.views += 1,
            Err(e) => tracing::warn!(code = %code, error = %e, "failed to count view"),
        }

        let (reactions, my_reactions) = self.reaction_summary(&confession.id, session).await?;
        let music = confession.song_link.as_deref().and_then(classify_music_link);

        Ok(Some(ConfessionView {
            confession,
            reactions,
            my_reactions,
            music,
        }))
    }

    /// Approved confessions, newest first. The page size is clamped to
    /// `1..=MAX_FEED_LIMIT` and a negative offset counts as zero.
    pub async fn feed(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Confession>, ConfessionError> {
        self.confessions
            .list(Some(ConfessionFilter {
                status: Some(ConfessionStatus::Approved),
                limit: Some(limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT)),
                offset: offset.map(|o| o.max(0)),
                ..Default::default()
            }))
            .await
            .map_err(storage)
    }

    /// Approved confessions matching `criteria`, newest first.
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<Confession>, ConfessionError> {
        if criteria.is_empty() {
            return Err(ConfessionError::MissingSearchCriteria);
        }
        let approved = self
            .confessions
            .list(Some(ConfessionFilter {
                status: Some(ConfessionStatus::Approved),
                ..Default::default()
            }))
            .await
            .map_err(storage)?;
        Ok(approved.into_iter().filter(|c| criteria.matches(c)).collect())
    }

    /// Record a reaction from `session`. A session may use each reaction
    /// type once per confession.
    pub async fn react(
        &self,
        code: &str,
        reaction_type: ReactionType,
        session: &str,
    ) -> Result<ReactionCounts, ConfessionError> {
        let session = session.trim();
        if session.is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert("session_id".into(), "A session identifier is required".into());
            return Err(ConfessionError::Validation(errors));
        }

        let code = normalize_code(code);
        let confession = self
            .confessions
            .get_by_code(&code)
            .await
            .map_err(storage)?
            .ok_or(ConfessionError::NotFound)?;

        let (mut counts, mine) = self.reaction_summary(&confession.id, Some(session)).await?;
        if mine.contains(&reaction_type) {
            return Err(ConfessionError::AlreadyReacted(reaction_type));
        }

        let reaction = Reaction {
            id: Uuid::now_v7(),
            confession_id: confession.id,
            reaction_type,
            session_identifier: session.to_string(),
            created_at: Utc::now(),
        };
        self.reactions.add(&reaction).await.map_err(storage)?;
        counts.increment(reaction_type);

        tracing::debug!(code = %code, reaction = %reaction_type, "reaction added");
        Ok(counts)
    }

    /// Every confession, optionally of one status, newest first.
    pub async fn admin_list(
        &self,
        status: Option<ConfessionStatus>,
    ) -> Result<Vec<Confession>, ConfessionError> {
        self.confessions
            .list(Some(ConfessionFilter {
                status,
                ..Default::default()
            }))
            .await
            .map_err(storage)
    }

    pub async fn moderate(
        &self,
        id: &ConfessionId,
        status: ConfessionStatus,
    ) -> Result<Confession, ConfessionError> {
        let confession = self
            .confessions
            .update_status(id, status)
            .await
            .map_err(storage)?;
        tracing::info!(confession_id = %id, %status, "confession moderated");
        Ok(confession)
    }

    pub async fn statistics(&self) -> Result<ConfessionStatistics, ConfessionError> {
        self.confessions.statistics().await.map_err(storage)
    }

    async fn reaction_summary(
        &self,
        id: &ConfessionId,
        session: Option<&str>,
    ) -> Result<(ReactionCounts, Vec<ReactionType>), ConfessionError> {
        let reactions = self
            .reactions
            .list_for_confession(id)
            .await
            .map_err(storage)?;

        let mut counts = ReactionCounts::default();
        let mut mine = Vec::new();
        for reaction in &reactions {
            counts.increment(reaction.reaction_type);
            if session == Some(reaction.session_identifier.as_str())
                && !mine.contains(&reaction.reaction_type)
            {
                mine.push(reaction.reaction_type);
            }
        }
        Ok((counts, mine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryConfessionRepository, MemoryReactionRepository};
    use lovenote_types::confession::YearOrBatch;
    use lovenote_types::draft::{AffiliationFields, IdentityFields, MessageFields};

    type Service = ConfessionService<MemoryConfessionRepository, MemoryReactionRepository>;

    fn service() -> Service {
        ConfessionService::new(MemoryConfessionRepository::new(), MemoryReactionRepository::new())
    }

    fn fields(college: &str, hint: Option<&str>) -> SubmissionFields {
        SubmissionFields {
            message: MessageFields {
                message: "You make Mondays bearable".to_string(),
                mood: Some("sweet".to_string()),
                song_link: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
            },
            affiliation: AffiliationFields {
                college_name: college.to_string(),
                department: "Computer Science".to_string(),
                year_or_batch: "2nd Year".to_string(),
                section: None,
                recipient_hint: hint.map(str::to_string),
            },
            identity: IdentityFields::default(),
        }
    }

    #[tokio::test]
    async fn test_submit_validates_every_step() {
        let svc = service();
        let mut bad = fields("M", None);
        bad.message.message = "short".to_string();
        bad.identity.is_anonymous = false;

        match svc.submit(bad).await.unwrap_err() {
            ConfessionError::Validation(errors) => {
                assert!(errors.contains_key("message"));
                assert!(errors.contains_key("college_name"));
                assert!(errors.contains_key("sender_name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(svc.repository().len(), 0);
    }

    #[tokio::test]
    async fn test_find_by_code_counts_views() {
        let svc = service();
        let created = svc.submit(fields("MIT", None)).await.unwrap();

        let view = svc
            .find_by_code(&created.unique_code.to_lowercase(), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.confession.id, created.id);
        assert_eq!(view.confession.views, 1);
        assert_eq!(view.confession.year_or_batch, YearOrBatch::Second);
        assert_eq!(
            view.music.unwrap().embed_url.as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found_without_views() {
        let svc = service();
        svc.submit(fields("MIT", None)).await.unwrap();

        assert!(svc.find_by_code("ZZZZZZZZ", None).await.unwrap().is_none());
        assert_eq!(svc.repository().total_views(), 0);
    }

    #[tokio::test]
    async fn test_malformed_code_is_not_found() {
        let svc = service();
        svc.submit(fields("MIT", None)).await.unwrap();

        assert!(svc.find_by_code("ABC", None).await.unwrap().is_none());
        assert!(svc.find_by_code("ABCD-2345", None).await.unwrap().is_none());
        assert_eq!(svc.repository().total_views(), 0);
    }

    #[tokio::test]
    async fn test_reactions_once_per_session_and_type() {
        let svc = service();
        let created = svc.submit(fields("MIT", None)).await.unwrap();
        let code = &created.unique_code;

        let counts = svc.react(code, ReactionType::Hearts, "s1").await.unwrap();
        assert_eq!(counts.hearts, 1);
        svc.react(code, ReactionType::Tears, "s1").await.unwrap();
        let counts = svc.react(code, ReactionType::Hearts, "s2").await.unwrap();
        assert_eq!(counts.hearts, 2);
        assert_eq!(counts.total(), 3);

        assert!(matches!(
            svc.react(code, ReactionType::Hearts, "s1").await,
            Err(ConfessionError::AlreadyReacted(ReactionType::Hearts))
        ));

        let view = svc.find_by_code(code, Some("s1")).await.unwrap().unwrap();
        assert_eq!(view.my_reactions, vec![ReactionType::Hearts, ReactionType::Tears]);
        assert_eq!(view.reactions.hearts, 2);
    }

    #[tokio::test]
    async fn test_react_requires_session_and_known_code() {
        let svc = service();
        assert!(matches!(
            svc.react("ABCDEFGH", ReactionType::Smiles, " ").await,
            Err(ConfessionError::Validation(_))
        ));
        assert!(matches!(
            svc.react("ABCDEFGH", ReactionType::Smiles, "s1").await,
            Err(ConfessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_search_requires_criteria_and_matches_substrings() {
        let svc = service();
        svc.submit(fields("Massachusetts Institute", Some("red scarf, library")))
            .await
            .unwrap();
        svc.submit(fields("Stanford", None)).await.unwrap();

        assert!(matches!(
            svc.search(&SearchCriteria::default()).await,
            Err(ConfessionError::MissingSearchCriteria)
        ));

        let found = svc
            .search(&SearchCriteria {
                college: Some("institute".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let found = svc
            .search(&SearchCriteria {
                name: Some("SCARF".to_string()),
                year: Some("2nd".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].college_name, "Massachusetts Institute");
    }

    #[tokio::test]
    async fn test_feed_hides_unapproved() {
        let svc = service();
        let first = svc.submit(fields("MIT", None)).await.unwrap();
        let second = svc.submit(fields("Yale", None)).await.unwrap();
        svc.moderate(&first.id, ConfessionStatus::Rejected).await.unwrap();

        let feed = svc.feed(None, None).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, second.id);

        let all = svc.admin_list(None).await.unwrap();
        assert_eq!(all.len(), 2);
        let rejected = svc.admin_list(Some(ConfessionStatus::Rejected)).await.unwrap();
        assert_eq!(rejected[0].id, first.id);

        let stats = svc.statistics().await.unwrap();
        assert_eq!(stats.total_confessions, 2);
        assert_eq!(stats.rejected_confessions, 1);
    }

    #[tokio::test]
    async fn test_feed_page_is_clamped() {
        let svc = service();
        for college in ["MIT", "Yale", "Brown"] {
            svc.submit(fields(college, None)).await.unwrap();
        }

        assert_eq!(svc.feed(Some(-1), None).await.unwrap().len(), 1);
        assert_eq!(svc.feed(Some(0), Some(-5)).await.unwrap().len(), 1);
        assert_eq!(svc.feed(Some(10_000), Some(-5)).await.unwrap().len(), 3);
        assert_eq!(svc.feed(Some(2), Some(2)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_moderate_unknown_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.moderate(&ConfessionId::new(), ConfessionStatus::Approved).await,
            Err(ConfessionError::NotFound)
        ));
    }
}
