use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load configuration for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Failed to build query: {0}")]
    Build(#[from] QueryBuildError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] core_types::CoreError),

    #[error("The requested data was not found in the database.")]
    NotFound,
}

/// Clause-ordering mistakes caught while a statement is being assembled.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryBuildError {
    #[error("an aggregate filter was emitted before the GROUP BY clause")]
    HavingBeforeGroupBy,

    #[error("a row filter was emitted after the GROUP BY clause")]
    RowFilterAfterGroupBy,

    #[error("GROUP BY was emitted twice")]
    DuplicateGroupBy,
}
