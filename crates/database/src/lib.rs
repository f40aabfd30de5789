//! # LightBnB Database Crate
//!
//! This crate is the application's interface to PostgreSQL. It turns search and
//! persistence requests into parameterized statements and runs them.
//!
//! ## Architectural Principles
//!
//! - **Typed statement assembly:** Property search is composed from a typed
//!   [`PropertyFilter`](core_types::PropertyFilter) by [`PropertySearch`], which
//!   keeps placeholder numbering and `WHERE`/`AND`/`HAVING` placement consistent.
//! - **Injected client:** The `PgPool` is handed in by the caller; nothing in this
//!   crate opens connections on its own except [`connect`].
//! - **Explicit errors:** Every operation returns `Result<_, DbError>`. A lookup that
//!   finds nothing is `Ok(None)`, never an error.
//!
//! ## Public API
//!
//! - `connect`: Builds the connection pool from configuration.
//! - `DbRepository`: The data access functions (users, properties, reservations, search).
//! - `ExecutionGateway`: Runs a `BuiltQuery` and logs it.
//! - `query`: The parameter list, predicate composer and property search builder.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod gateway;
pub mod query;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::{DbError, QueryBuildError};
pub use gateway::ExecutionGateway;
pub use query::{BuiltQuery, PriceConjunction, PropertySearch, SqlParam, DEFAULT_LIMIT};
pub use repository::DbRepository;
