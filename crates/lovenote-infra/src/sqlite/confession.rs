//! SQLite confession repository implementation.
//!
//! Implements `ConfessionRepository` from `lovenote-core` using sqlx with
//! split read/write pools.

use chrono::Utc;
use lovenote_core::repository::SortOrder;
use lovenote_core::repository::confession::{ConfessionFilter, ConfessionRepository};
use lovenote_types::confession::{
    Confession, ConfessionId, ConfessionStatistics, ConfessionStatus, Mood, NewConfession,
    YearOrBatch,
};
use lovenote_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ConfessionRepository`.
pub struct SqliteConfessionRepository {
    pool: DatabasePool,
}

impl SqliteConfessionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Confession.
struct ConfessionRow {
    id: String,
    message: String,
    mood: Option<String>,
    song_link: Option<String>,
    college_name: String,
    department: Option<String>,
    year_or_batch: String,
    section: Option<String>,
    recipient_hint: Option<String>,
    is_anonymous: bool,
    sender_name: Option<String>,
    sender_email: Option<String>,
    sender_phone: Option<String>,
    sender_section: Option<String>,
    additional_message: Option<String>,
    unique_code: String,
    status: String,
    views: i64,
    created_at: String,
    updated_at: String,
}

impl ConfessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            message: row.try_get("message")?,
            mood: row.try_get("mood")?,
            song_link: row.try_get("song_link")?,
            college_name: row.try_get("college_name")?,
            department: row.try_get("department")?,
            year_or_batch: row.try_get("year_or_batch")?,
            section: row.try_get("section")?,
            recipient_hint: row.try_get("recipient_hint")?,
            is_anonymous: row.try_get("is_anonymous")?,
            sender_name: row.try_get("sender_name")?,
            sender_email: row.try_get("sender_email")?,
            sender_phone: row.try_get("sender_phone")?,
            sender_section: row.try_get("sender_section")?,
            additional_message: row.try_get("additional_message")?,
            unique_code: row.try_get("unique_code")?,
            status: row.try_get("status")?,
            views: row.try_get("views")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_confession(self) -> Result<Confession, RepositoryError> {
        let id = self
            .id
            .parse::<ConfessionId>()
            .map_err(|e| RepositoryError::Query(format!("invalid confession id: {e}")))?;

        let mood = self
            .mood
            .as_deref()
            .map(str::parse::<Mood>)
            .transpose()
            .map_err(RepositoryError::Query)?;

        let year_or_batch: YearOrBatch = self
            .year_or_batch
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        let status: ConfessionStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Confession {
            id,
            message: self.message,
            mood,
            song_link: self.song_link,
            college_name: self.college_name,
            department: self.department,
            year_or_batch,
            section: self.section,
            recipient_hint: self.recipient_hint,
            is_anonymous: self.is_anonymous,
            sender_name: self.sender_name,
            sender_email: self.sender_email,
            sender_phone: self.sender_phone,
            sender_section: self.sender_section,
            additional_message: self.additional_message,
            unique_code: self.unique_code,
            status,
            views: self.views,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_row(row: Option<sqlx::sqlite::SqliteRow>) -> Result<Option<Confession>, RepositoryError> {
    match row {
        Some(row) => {
            let confession_row =
                ConfessionRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            Ok(Some(confession_row.into_confession()?))
        }
        None => Ok(None),
    }
}

impl ConfessionRepository for SqliteConfessionRepository {
    async fn create(&self, new: &NewConfession) -> Result<Confession, RepositoryError> {
        let confession = Confession::from_new(new.clone(), ConfessionId::new(), Utc::now());

        let result = sqlx::query(
            "INSERT INTO confessions (id, message, mood, song_link, college_name, department, year_or_batch, section, recipient_hint, is_anonymous, sender_name, sender_email, sender_phone, sender_section, additional_message, unique_code, status, views, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(confession.id.to_string())
        .bind(&confession.message)
        .bind(confession.mood.map(|m| m.to_string()))
        .bind(&confession.song_link)
        .bind(&confession.college_name)
        .bind(&confession.department)
        .bind(confession.year_or_batch.label())
        .bind(&confession.section)
        .bind(&confession.recipient_hint)
        .bind(confession.is_anonymous)
        .bind(&confession.sender_name)
        .bind(&confession.sender_email)
        .bind(&confession.sender_phone)
        .bind(&confession.sender_section)
        .bind(&confession.additional_message)
        .bind(&confession.unique_code)
        .bind(confession.status.to_string())
        .bind(confession.views)
        .bind(format_datetime(&confession.created_at))
        .bind(format_datetime(&confession.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(confession),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "unique_code '{}' already exists",
                    confession.unique_code
                )))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Confession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM confessions WHERE unique_code = ?")
            .bind(code)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_row(row)
    }

    async fn get_by_id(&self, id: &ConfessionId) -> Result<Option<Confession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM confessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_row(row)
    }

    async fn list(
        &self,
        filter: Option<ConfessionFilter>,
    ) -> Result<Vec<Confession>, RepositoryError> {
        let mut sql = String::from("SELECT * FROM confessions");
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        let filter = filter.unwrap_or_default();

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            binds.push(status.to_string());
        }
        if let Some(college_name) = filter.college_name {
            conditions.push("college_name = ?");
            binds.push(college_name);
        }
        if let Some(department) = filter.department {
            conditions.push("department = ?");
            binds.push(department);
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        let order = match filter.sort_order.unwrap_or_default() {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY created_at {order}, id {order}"));

        // Pagination (SQLite needs a LIMIT before OFFSET)
        match (filter.limit, filter.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }

        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut confessions = Vec::with_capacity(rows.len());
        for row in &rows {
            let confession_row =
                ConfessionRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            confessions.push(confession_row.into_confession()?);
        }

        Ok(confessions)
    }

    async fn update_status(
        &self,
        id: &ConfessionId,
        status: ConfessionStatus,
    ) -> Result<Confession, RepositoryError> {
        let result = sqlx::query("UPDATE confessions SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(format_datetime(&Utc::now()))
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        // Read back through the writer so the update is visible
        let row = sqlx::query("SELECT * FROM confessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_row(row)?.ok_or(RepositoryError::NotFound)
    }

    async fn increment_views(&self, id: &ConfessionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE confessions SET views = views + 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn statistics(&self) -> Result<ConfessionStatistics, RepositoryError> {
        let row = sqlx::query(
            "SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN status = 'approved' THEN 1 ELSE 0 END), 0) AS approved,
                COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0) AS pending,
                COALESCE(SUM(CASE WHEN status = 'rejected' THEN 1 ELSE 0 END), 0) AS rejected,
                COALESCE(SUM(views), 0) AS total_views,
                (SELECT COUNT(*) FROM confession_reactions) AS total_reactions
             FROM confessions",
        )
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let get = |column: &str| -> Result<i64, RepositoryError> {
            row.try_get(column)
                .map_err(|e| RepositoryError::Query(e.to_string()))
        };

        Ok(ConfessionStatistics {
            total_confessions: get("total")?,
            approved_confessions: get("approved")?,
            pending_confessions: get("pending")?,
            rejected_confessions: get("rejected")?,
            total_views: get("total_views")?,
            total_reactions: get("total_reactions")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_confession(code: &str, college: &str, anonymous: bool) -> NewConfession {
        NewConfession {
            message: "You light up the library".to_string(),
            mood: Some(Mood::Shy),
            song_link: None,
            college_name: college.to_string(),
            department: Some("Physics".to_string()),
            year_or_batch: YearOrBatch::Final,
            section: None,
            recipient_hint: Some("green backpack".to_string()),
            is_anonymous: anonymous,
            sender_name: (!anonymous).then(|| "Noor".to_string()),
            sender_email: None,
            sender_phone: None,
            sender_section: None,
            additional_message: None,
            unique_code: code.to_string(),
            status: ConfessionStatus::Approved,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_by_code() {
        let repo = SqliteConfessionRepository::new(test_pool().await);
        let created = repo
            .create(&make_confession("ABCDEFGH", "MIT", false))
            .await
            .unwrap();

        let fetched = repo.get_by_code("ABCDEFGH").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.mood, Some(Mood::Shy));
        assert_eq!(fetched.year_or_batch, YearOrBatch::Final);
        assert_eq!(fetched.sender_name.as_deref(), Some("Noor"));
        assert!(!fetched.is_anonymous);
        assert_eq!(fetched.views, 0);

        let by_id = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.unique_code, "ABCDEFGH");
    }

    #[tokio::test]
    async fn test_unknown_code_is_none() {
        let repo = SqliteConfessionRepository::new(test_pool().await);
        assert!(repo.get_by_code("ZZZZZZZZ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let repo = SqliteConfessionRepository::new(test_pool().await);
        repo.create(&make_confession("HJKLMNPQ", "MIT", true))
            .await
            .unwrap();
        let err = repo
            .create(&make_confession("HJKLMNPQ", "Yale", true))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let repo = SqliteConfessionRepository::new(test_pool().await);
        let a = repo.create(&make_confession("AAAAAAAA", "MIT", true)).await.unwrap();
        let b = repo.create(&make_confession("BBBBBBBB", "Yale", true)).await.unwrap();
        let c = repo.create(&make_confession("CCCCCCCC", "MIT", true)).await.unwrap();
        repo.update_status(&b.id, ConfessionStatus::Rejected)
            .await
            .unwrap();

        let approved = repo
            .list(Some(ConfessionFilter {
                status: Some(ConfessionStatus::Approved),
                ..Default::default()
            }))
            .await
            .unwrap();
        let ids: Vec<_> = approved.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![c.id, a.id]);

        let mit = repo
            .list(Some(ConfessionFilter {
                college_name: Some("MIT".to_string()),
                sort_order: Some(SortOrder::Asc),
                limit: Some(1),
                offset: Some(1),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(mit.len(), 1);
        assert_eq!(mit[0].id, c.id);

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_status_and_views() {
        let repo = SqliteConfessionRepository::new(test_pool().await);
        let created = repo
            .create(&make_confession("DDDDDDDD", "MIT", true))
            .await
            .unwrap();

        let updated = repo
            .update_status(&created.id, ConfessionStatus::Pending)
            .await
            .unwrap();
        assert_eq!(updated.status, ConfessionStatus::Pending);

        repo.increment_views(&created.id).await.unwrap();
        repo.increment_views(&created.id).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.views, 2);

        let missing = ConfessionId::new();
        assert!(matches!(
            repo.update_status(&missing, ConfessionStatus::Approved).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.increment_views(&missing).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_statistics() {
        let repo = SqliteConfessionRepository::new(test_pool().await);
        let empty = repo.statistics().await.unwrap();
        assert_eq!(empty, ConfessionStatistics::default());

        let a = repo.create(&make_confession("EEEEEEEE", "MIT", true)).await.unwrap();
        let b = repo.create(&make_confession("FFFFFFFF", "MIT", true)).await.unwrap();
        repo.update_status(&b.id, ConfessionStatus::Rejected)
            .await
            .unwrap();
        repo.increment_views(&a.id).await.unwrap();

        let stats = repo.statistics().await.unwrap();
        assert_eq!(stats.total_confessions, 2);
        assert_eq!(stats.approved_confessions, 1);
        assert_eq!(stats.rejected_confessions, 1);
        assert_eq!(stats.pending_confessions, 0);
        assert_eq!(stats.total_views, 1);
        assert_eq!(stats.total_reactions, 0);
    }
}
