use crate::error::DbError;
use configuration::Database;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is the only database handle the rest of the crate needs; hand it
/// to [`crate::DbRepository::new`] so every query runs through an injected client.
pub async fn connect(settings: &Database) -> Result<PgPool, DbError> {
    if settings.url.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "DATABASE_URL must be set.".to_string(),
        ));
    }

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&settings.url)
        .await?;

    tracing::info!(max_connections = settings.max_connections, "Connected to Postgres.");
    Ok(pool)
}
