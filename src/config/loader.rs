use crate::config::types::{Config, CrawlerConfig, PostgresConfig, StoreConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

/// Catalog entry page used when `CATALOG_START_URL` is not set
pub const DEFAULT_START_URL: &str = "https://books.toscrape.com/catalogue/page-1.html";

/// Worker count used when `CATALOG_WORKERS` is not set
pub const DEFAULT_WORKERS: usize = 8;

/// User agent used when `CATALOG_USER_AGENT` is not set
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36 OPR/117.0.0.0";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Loads and validates configuration from the process environment
///
/// A `.env` file in the working directory is applied first if present;
/// variables already set in the environment win over the file.
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - A required variable is missing or a value is invalid
pub fn load_config() -> Result<Config, ConfigError> {
    match dotenv::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }

    Config::from_lookup(|key| std::env::var(key).ok())
}

impl Config {
    /// Builds a configuration from an arbitrary variable lookup
    ///
    /// `load_config` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let crawler = CrawlerConfig {
            start_url: get("CATALOG_START_URL").unwrap_or_else(|| DEFAULT_START_URL.to_string()),
            workers: parse_or("CATALOG_WORKERS", get("CATALOG_WORKERS"), DEFAULT_WORKERS)?,
            user_agent: get("CATALOG_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout_secs: parse_or(
                "CATALOG_TIMEOUT_SECS",
                get("CATALOG_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )?,
        };

        let store = match get("CATALOG_SQLITE_PATH") {
            Some(path) => StoreConfig::Sqlite {
                path: PathBuf::from(path),
            },
            None => {
                let require =
                    |key: &str| get(key).ok_or_else(|| ConfigError::Missing(key.to_string()));
                StoreConfig::Postgres(PostgresConfig {
                    user: require("POSTGRES_USER")?,
                    password: require("POSTGRES_PASSWORD")?,
                    host: require("POSTGRES_HOST")?,
                    port: parse_or("POSTGRES_PORT", Some(require("POSTGRES_PORT")?), 0)?,
                    database: require("POSTGRES_DB")?,
                })
            }
        };

        let config = Config { crawler, store };
        validate(&config)?;
        Ok(config)
    }
}

fn parse_or<T>(var: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: var.to_string(),
            message: format!("{:?}: {}", value, e),
        }),
    }
}
