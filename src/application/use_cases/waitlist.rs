use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::validators::{is_valid_email, normalize_email},
    domain::entities::waitlist_entry::WaitlistEntry,
};

pub const JOIN_SUCCESS_MESSAGE: &str = "Successfully joined the waitlist!";

// ============================================================================
// Repository Traits
// ============================================================================

/// Entry point to the waitlist store. Every service call runs inside its own
/// session obtained from [`WaitlistRepoTrait::begin`].
#[async_trait]
pub trait WaitlistRepoTrait: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn WaitlistSession>>;
}

/// A request-scoped unit of work against the store.
///
/// Writes become durable only through [`WaitlistSession::commit`]. Dropping a
/// session without committing discards everything it wrote.
#[async_trait]
pub trait WaitlistSession: Send {
    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<WaitlistEntry>>;

    /// Fails with [`AppError::Conflict`] when the email is already stored.
    async fn insert(&mut self, email: &str) -> AppResult<WaitlistEntry>;

    async fn count_all(&mut self) -> AppResult<i64>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub message: String,
    /// Total registrant count observed right after the insert. Concurrent
    /// joiners may see equal or swapped values, so this is a display hint and
    /// not an authoritative rank.
    pub position: i64,
}

#[derive(Clone)]
pub struct WaitlistUseCases {
    repo: Arc<dyn WaitlistRepoTrait>,
}

impl WaitlistUseCases {
    pub fn new(repo: Arc<dyn WaitlistRepoTrait>) -> Self {
        Self { repo }
    }

    #[instrument(skip_all)]
    pub async fn join(&self, email: &str) -> AppResult<JoinOutcome> {
        if !is_valid_email(email) {
            return Err(AppError::InvalidInput("Invalid email format".into()));
        }
        let email = normalize_email(email);

        let mut session = self.repo.begin().await?;

        if session.find_by_email(&email).await?.is_some() {
            return Err(AppError::AlreadyRegistered);
        }

        // The pre-check above is not atomic with the insert; the store's
        // unique constraint decides races.
        let entry = session
            .insert(&email)
            .await
            .map_err(conflict_as_duplicate)?;

        let position = session.count_all().await?;
        session.commit().await.map_err(conflict_as_duplicate)?;

        info!(entry_id = entry.id, position, "Joined waitlist");

        Ok(JoinOutcome {
            message: JOIN_SUCCESS_MESSAGE.to_string(),
            position,
        })
    }

    #[instrument(skip_all)]
    pub async fn count(&self) -> AppResult<i64> {
        let mut session = self.repo.begin().await?;
        let count = session.count_all().await?;
        session.commit().await?;
        Ok(count)
    }
}

fn conflict_as_duplicate(err: AppError) -> AppError {
    match err {
        AppError::Conflict => {
            warn!("Concurrent join for the same email lost the race");
            AppError::AlreadyRegistered
        }
        other => other,
    }
}
