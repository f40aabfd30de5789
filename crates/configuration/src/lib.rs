use crate::error::ConfigError;
use std::env;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Auth, Config, Database, Logging, Search, Server};

/// Loads the application configuration from `config.toml` and the environment.
///
/// Sources, lowest precedence first: built-in defaults, `config.toml` (optional),
/// `LIGHTBNB__SECTION__KEY` environment variables, and finally `DATABASE_URL`.
/// A `.env` file in the working directory is loaded first if present.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from(Path::new("config.toml"))
}

/// Same as [`load_config`] but reads the given file instead of `config.toml`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("database.max_connections", 10)?
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("LIGHTBNB")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("database.url", env::var("DATABASE_URL").ok())?
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

impl Config {
    /// Checks the values serde cannot: ranges and required-but-defaulted fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url is empty; set DATABASE_URL".to_string(),
            ));
        }
        if self.search.default_limit <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "search.default_limit must be positive, got {}",
                self.search.default_limit
            )));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ConfigError::ValidationError(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn clear_env() {
        // SAFETY: tests touching the environment are serialized.
        unsafe {
            env::remove_var("DATABASE_URL");
            env::remove_var("LIGHTBNB__SEARCH__DEFAULT_LIMIT");
        }
    }

    #[test]
    #[serial]
    fn defaults_fill_missing_sections() {
        clear_env();
        let file = write_config("[database]\nurl = \"postgres://localhost/lightbnb\"\n");

        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.database.url, "postgres://localhost/lightbnb");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.search.default_limit, 10);
        assert!(!config.search.legacy_price_conjunction);
        assert_eq!(config.auth.bcrypt_cost, 12);
    }

    #[test]
    #[serial]
    fn environment_overrides_file() {
        clear_env();
        let file = write_config(
            "[database]\nurl = \"postgres://file/db\"\n[search]\ndefault_limit = 5\nlegacy_price_conjunction = true\n",
        );
        // SAFETY: serialized with the other environment tests.
        unsafe {
            env::set_var("DATABASE_URL", "postgres://env/db");
            env::set_var("LIGHTBNB__SEARCH__DEFAULT_LIMIT", "25");
        }

        let config = load_config_from(file.path()).unwrap();
        clear_env();

        assert_eq!(config.database.url, "postgres://env/db");
        assert_eq!(config.search.default_limit, 25);
        assert!(config.search.legacy_price_conjunction);
    }

    #[test]
    #[serial]
    fn missing_database_url_fails_validation() {
        clear_env();
        let file = write_config("[server]\nport = 8080\nhost = \"127.0.0.1\"\n");

        let err = load_config_from(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    #[serial]
    fn out_of_range_bcrypt_cost_is_rejected() {
        clear_env();
        let file = write_config("[database]\nurl = \"postgres://x/y\"\n[auth]\nbcrypt_cost = 2\n");

        let err = load_config_from(file.path()).unwrap_err();

        assert!(err.to_string().contains("bcrypt_cost"));
    }
}
