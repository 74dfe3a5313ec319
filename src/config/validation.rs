use crate::config::types::{Config, CrawlerConfig, PostgresConfig, StoreConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_store_config(&config.store)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout must be at least 1 second".to_string(),
        ));
    }

    let start = Url::parse(&config.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL: {}", e)))?;
    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use http or https",
            config.start_url
        )));
    }

    validate_user_agent(&config.user_agent)?;

    Ok(())
}

/// A header value may not be empty or carry control characters
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user_agent cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    match config {
        StoreConfig::Sqlite { path } => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "sqlite path cannot be empty".to_string(),
                ));
            }
            Ok(())
        }
        StoreConfig::Postgres(pg) => validate_postgres_config(pg),
    }
}

fn validate_postgres_config(config: &PostgresConfig) -> Result<(), ConfigError> {
    if config.port == 0 {
        return Err(ConfigError::Validation(
            "postgres port cannot be 0".to_string(),
        ));
    }

    if config.host.contains('/') || config.host.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid postgres host: '{}'",
            config.host
        )));
    }

    Ok(())
}
