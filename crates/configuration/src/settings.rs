use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: Database,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub search: Search,
    #[serde(default)]
    pub auth: Auth,
    #[serde(default)]
    pub logging: Logging,
}

/// Connection settings handed to the Postgres pool.
#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    /// A `postgres://` connection string. Usually supplied through `DATABASE_URL`.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Property search behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
    /// Number of rows returned when the caller does not ask for a specific limit.
    pub default_limit: i64,
    /// Join the price-range filter with a bare `AND`, even when it is the first
    /// filter in the statement. Reproduces the historical query shape.
    pub legacy_price_conjunction: bool,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            default_limit: 10,
            legacy_price_conjunction: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Auth {
    /// Work factor for password hashing.
    pub bcrypt_cost: u32,
}

impl Default for Auth {
    fn default() -> Self {
        Self { bcrypt_cost: 12 }
    }
}

/// Log output settings. `directory` enables a daily rolling file next to stdout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub filter: String,
    pub directory: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}
