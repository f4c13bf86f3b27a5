use async_trait::async_trait;
use sqlx::{Postgres, Row, Transaction};

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::{WaitlistRepoTrait, WaitlistSession},
    domain::entities::waitlist_entry::WaitlistEntry,
};

fn row_to_entry(row: sqlx::postgres::PgRow) -> WaitlistEntry {
    WaitlistEntry {
        id: row.get("id"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl WaitlistRepoTrait for PostgresPersistence {
    async fn begin(&self) -> AppResult<Box<dyn WaitlistSession>> {
        let tx = self.pool.begin().await.map_err(AppError::from)?;
        Ok(Box::new(PostgresWaitlistSession { tx }))
    }
}

/// One database transaction. sqlx rolls the transaction back when it is
/// dropped without `commit`, which covers every early return in the use cases.
pub struct PostgresWaitlistSession {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl WaitlistSession for PostgresWaitlistSession {
    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, created_at
            FROM waitlist
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_entry))
    }

    async fn insert(&mut self, email: &str) -> AppResult<WaitlistEntry> {
        let row = sqlx::query(
            r#"
            INSERT INTO waitlist (email)
            VALUES ($1)
            RETURNING id, email, created_at
            "#,
        )
        .bind(email)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_entry(row))
    }

    async fn count_all(&mut self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM waitlist")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(AppError::from)?;

        Ok(row.get("count"))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(AppError::from)
    }
}
