//! Configuration module for Catalog-Harvest
//!
//! Settings come from the process environment (after an optional `.env` file is
//! applied) and are validated once at startup.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvest::config::load_config;
//!
//! let config = load_config().unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod loader;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, PostgresConfig, StoreConfig};

// Re-export loader functions
pub use loader::{load_config, DEFAULT_START_URL, DEFAULT_USER_AGENT, DEFAULT_WORKERS};
