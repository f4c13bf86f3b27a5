//! In-memory mock implementation of the waitlist store.
//!
//! Emulates the pieces of Postgres behavior the use cases depend on: a unique
//! email constraint, read-committed visibility and rollback when a session is
//! dropped without committing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::{WaitlistRepoTrait, WaitlistSession},
    domain::entities::waitlist_entry::WaitlistEntry,
};

#[derive(Default)]
struct WaitlistState {
    committed: Vec<WaitlistEntry>,
    pending: HashMap<u64, Vec<WaitlistEntry>>,
    next_id: i64,
    next_session: u64,
}

impl WaitlistState {
    fn email_taken(&self, email: &str) -> bool {
        self.committed.iter().any(|e| e.email == email)
            || self.pending.values().flatten().any(|e| e.email == email)
    }
}

/// In-memory implementation of WaitlistRepoTrait for testing.
pub struct InMemoryWaitlistRepo {
    state: Arc<Mutex<WaitlistState>>,
    stale_reads: bool,
    fail_counts: bool,
}

impl Default for InMemoryWaitlistRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryWaitlistRepo {
    pub fn new() -> Self {
        Self::with_entries(vec![])
    }

    /// Seed the repo with already committed entries.
    pub fn with_entries(entries: Vec<WaitlistEntry>) -> Self {
        let next_id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        Self {
            state: Arc::new(Mutex::new(WaitlistState {
                committed: entries,
                next_id,
                ..Default::default()
            })),
            stale_reads: false,
            fail_counts: false,
        }
    }

    /// `find_by_email` ignores committed rows, simulating a concurrent joiner
    /// that commits between the pre-check and the insert.
    pub fn with_stale_reads(mut self) -> Self {
        self.stale_reads = true;
        self
    }

    /// `count_all` fails with a database error.
    pub fn with_failing_counts(mut self) -> Self {
        self.fail_counts = true;
        self
    }

    /// Committed entries in insertion order (for test assertions).
    pub fn get_all(&self) -> Vec<WaitlistEntry> {
        self.state.lock().unwrap().committed.clone()
    }
}

#[async_trait]
impl WaitlistRepoTrait for InMemoryWaitlistRepo {
    async fn begin(&self) -> AppResult<Box<dyn WaitlistSession>> {
        let mut state = self.state.lock().unwrap();
        let session_id = state.next_session;
        state.next_session += 1;

        Ok(Box::new(InMemoryWaitlistSession {
            state: self.state.clone(),
            session_id,
            stale_reads: self.stale_reads,
            fail_counts: self.fail_counts,
        }))
    }
}

pub struct InMemoryWaitlistSession {
    state: Arc<Mutex<WaitlistState>>,
    session_id: u64,
    stale_reads: bool,
    fail_counts: bool,
}

#[async_trait]
impl WaitlistSession for InMemoryWaitlistSession {
    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        let state = self.state.lock().unwrap();
        let own = state.pending.get(&self.session_id).into_iter().flatten();

        let found = if self.stale_reads {
            own.into_iter().find(|e| e.email == email)
        } else {
            state.committed.iter().chain(own).find(|e| e.email == email)
        };
        Ok(found.cloned())
    }

    async fn insert(&mut self, email: &str) -> AppResult<WaitlistEntry> {
        let mut state = self.state.lock().unwrap();
        if state.email_taken(email) {
            return Err(AppError::Conflict);
        }

        let entry = WaitlistEntry {
            id: state.next_id,
            email: email.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        state.next_id += 1;
        state
            .pending
            .entry(self.session_id)
            .or_default()
            .push(entry.clone());

        Ok(entry)
    }

    async fn count_all(&mut self) -> AppResult<i64> {
        if self.fail_counts {
            return Err(AppError::Database("Database operation failed".into()));
        }
        let state = self.state.lock().unwrap();
        let own = state.pending.get(&self.session_id).map_or(0, Vec::len);
        Ok((state.committed.len() + own) as i64)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        {
            let mut state = self.state.lock().unwrap();
            if let Some(entries) = state.pending.remove(&self.session_id) {
                state.committed.extend(entries);
            }
        }
        Ok(())
    }
}

impl Drop for InMemoryWaitlistSession {
    fn drop(&mut self) {
        // Rollback; a committed session has nothing pending any more.
        if let Ok(mut state) = self.state.lock() {
            state.pending.remove(&self.session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_entry;

    #[tokio::test]
    async fn test_insert_then_commit_is_visible() {
        let repo = InMemoryWaitlistRepo::new();

        let mut session = repo.begin().await.unwrap();
        let entry = session.insert("a@x.com").await.unwrap();
        session.commit().await.unwrap();

        assert_eq!(entry.id, 1);
        assert_eq!(repo.get_all(), vec![entry]);
    }

    #[tokio::test]
    async fn test_drop_without_commit_rolls_back() {
        let repo = InMemoryWaitlistRepo::new();

        {
            let mut session = repo.begin().await.unwrap();
            session.insert("a@x.com").await.unwrap();
            assert_eq!(session.count_all().await.unwrap(), 1);
        }

        assert!(repo.get_all().is_empty());
        let mut session = repo.begin().await.unwrap();
        assert_eq!(session.count_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let repo = InMemoryWaitlistRepo::new();

        let mut first = repo.begin().await.unwrap();
        first.insert("a@x.com").await.unwrap();
        let mut second = repo.begin().await.unwrap();
        let result = second.insert("a@x.com").await;

        assert!(matches!(result, Err(AppError::Conflict)));
    }

    #[tokio::test]
    async fn test_uncommitted_rows_hidden_from_other_sessions() {
        let repo = InMemoryWaitlistRepo::new();

        let mut writer = repo.begin().await.unwrap();
        writer.insert("a@x.com").await.unwrap();
        let mut reader = repo.begin().await.unwrap();

        assert_eq!(reader.count_all().await.unwrap(), 0);
        assert!(reader.find_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seeded_entries_continue_id_sequence() {
        let seeded = create_test_entry(|e| e.id = 7);
        let repo = InMemoryWaitlistRepo::with_entries(vec![seeded]);

        let mut session = repo.begin().await.unwrap();
        let entry = session.insert("new@x.com").await.unwrap();

        assert_eq!(entry.id, 8);
    }
}
