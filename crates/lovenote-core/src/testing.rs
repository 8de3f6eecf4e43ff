//! In-memory repository fakes for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;

use lovenote_types::confession::{
    Confession, ConfessionId, ConfessionStatistics, ConfessionStatus, NewConfession, Reaction,
};
use lovenote_types::error::RepositoryError;

use crate::repository::SortOrder;
use crate::repository::confession::{ConfessionFilter, ConfessionRepository};
use crate::repository::reaction::ReactionRepository;

#[derive(Default)]
pub struct MemoryConfessionRepository {
    rows: Mutex<Vec<Confession>>,
    failing_creates: AtomicUsize,
    creates: AtomicUsize,
}

impl MemoryConfessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` creates fail with a query error.
    pub fn fail_next_creates(&self, n: usize) {
        self.failing_creates.store(n, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn total_views(&self) -> i64 {
        self.rows.lock().unwrap().iter().map(|c| c.views).sum()
    }
}

impl ConfessionRepository for MemoryConfessionRepository {
    async fn create(&self, new: &NewConfession) -> Result<Confession, RepositoryError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let pending_failures = self.failing_creates.load(Ordering::SeqCst);
        if pending_failures > 0 {
            self.failing_creates.store(pending_failures - 1, Ordering::SeqCst);
            return Err(RepositoryError::Query("simulated outage".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.unique_code == new.unique_code) {
            return Err(RepositoryError::Conflict(format!(
                "unique_code '{}' already exists",
                new.unique_code
            )));
        }
        let confession = Confession::from_new(new.clone(), ConfessionId::new(), Utc::now());
        rows.push(confession.clone());
        Ok(confession)
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Confession>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|c| c.unique_code == code).cloned())
    }

    async fn get_by_id(&self, id: &ConfessionId) -> Result<Option<Confession>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|c| c.id == *id).cloned())
    }

    async fn list(
        &self,
        filter: Option<ConfessionFilter>,
    ) -> Result<Vec<Confession>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut rows: Vec<Confession> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .filter(|c| {
                filter
                    .college_name
                    .as_ref()
                    .is_none_or(|n| &c.college_name == n)
            })
            .filter(|c| {
                filter
                    .department
                    .as_ref()
                    .is_none_or(|d| c.department.as_ref() == Some(d))
            })
            .cloned()
            .collect();
        // v7 ids sort by creation time even within one clock tick
        rows.sort_by_key(|c| c.id.0);
        if filter.sort_order.unwrap_or_default() == SortOrder::Desc {
            rows.reverse();
        }
        let offset = filter.offset.unwrap_or(0).max(0) as usize;
        let limit = filter.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn update_status(
        &self,
        id: &ConfessionId,
        status: ConfessionStatus,
    ) -> Result<Confession, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn increment_views(&self, id: &ConfessionId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        row.views += 1;
        Ok(())
    }

    async fn statistics(&self) -> Result<ConfessionStatistics, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        let count = |s: ConfessionStatus| rows.iter().filter(|c| c.status == s).count() as i64;
        Ok(ConfessionStatistics {
            total_confessions: rows.len() as i64,
            approved_confessions: count(ConfessionStatus::Approved),
            pending_confessions: count(ConfessionStatus::Pending),
            rejected_confessions: count(ConfessionStatus::Rejected),
            total_views: rows.iter().map(|c| c.views).sum(),
            total_reactions: 0,
        })
    }
}

#[derive(Default)]
pub struct MemoryReactionRepository {
    rows: Mutex<Vec<Reaction>>,
}

impl MemoryReactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl ReactionRepository for MemoryReactionRepository {
    async fn add(&self, reaction: &Reaction) -> Result<(), RepositoryError> {
        self.rows.lock().unwrap().push(reaction.clone());
        Ok(())
    }

    async fn list_for_confession(
        &self,
        confession_id: &ConfessionId,
    ) -> Result<Vec<Reaction>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.confession_id == *confession_id)
            .cloned()
            .collect())
    }
}
