use crate::error::DbError;
use crate::query::{BuiltQuery, SqlParam};
use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};
use std::time::Instant;

/// Runs built statements against the pool and logs each one.
///
/// Every call is a single attempt: the statement text, elapsed time and row
/// count are logged, and a failure is logged and returned as [`DbError::Query`].
#[derive(Debug, Clone)]
pub struct ExecutionGateway {
    pool: PgPool,
}

impl ExecutionGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn fetch_all<T>(&self, query: &BuiltQuery) -> Result<Vec<T>, DbError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let started = Instant::now();
        let result = bind_all(sqlx::query_as::<_, T>(&query.sql), &query.params)
            .fetch_all(&self.pool)
            .await;
        let rows = result.as_ref().map(Vec::len).unwrap_or(0);
        log_outcome(query, started, rows, result.as_ref().err());
        Ok(result?)
    }

    pub async fn fetch_optional<T>(&self, query: &BuiltQuery) -> Result<Option<T>, DbError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let started = Instant::now();
        let result = bind_all(sqlx::query_as::<_, T>(&query.sql), &query.params)
            .fetch_optional(&self.pool)
            .await;
        let rows = match &result {
            Ok(Some(_)) => 1,
            _ => 0,
        };
        log_outcome(query, started, rows, result.as_ref().err());
        Ok(result?)
    }

    /// Like [`fetch_optional`](Self::fetch_optional) but an empty result is [`DbError::NotFound`].
    pub async fn fetch_one<T>(&self, query: &BuiltQuery) -> Result<T, DbError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        self.fetch_optional(query).await?.ok_or(DbError::NotFound)
    }
}

fn bind_all<'q, T>(
    mut query: QueryAs<'q, Postgres, T, PgArguments>,
    params: &'q [SqlParam],
) -> QueryAs<'q, Postgres, T, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(value) => query.bind(value.as_str()),
            SqlParam::Int(value) => query.bind(*value),
            SqlParam::BigInt(value) => query.bind(*value),
            SqlParam::Decimal(value) => query.bind(*value),
            SqlParam::Date(value) => query.bind(*value),
        };
    }
    query
}

// Bound values are not logged: insert statements carry password hashes.
fn log_outcome(query: &BuiltQuery, started: Instant, rows: usize, error: Option<&sqlx::Error>) {
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match error {
        None => tracing::info!(
            sql = %query.sql,
            params = query.params.len(),
            elapsed_ms,
            rows,
            "executed query"
        ),
        Some(e) => tracing::error!(
            sql = %query.sql,
            params = query.params.len(),
            elapsed_ms,
            error = %e,
            "query failed"
        ),
    }
}
