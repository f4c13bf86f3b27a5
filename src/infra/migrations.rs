//! Schema setup for the waitlist table, run once at startup.

use sqlx::PgPool;

use crate::infra::error::InfraError;

pub async fn run(pool: &PgPool) -> Result<(), InfraError> {
    tracing::info!("Running waitlist migrations...");

    // UNIQUE(email) is what decides concurrent joins for the same address.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS waitlist (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'utc')
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(InfraError::Migration)?;

    // Rows written outside the service may skip normalization.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS waitlist_email_lower_key ON waitlist (LOWER(email))",
    )
    .execute(pool)
    .await
    .map_err(InfraError::Migration)?;

    tracing::info!("Waitlist migrations complete");
    Ok(())
}
