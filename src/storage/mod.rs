//! Storage module for persisting catalog records
//!
//! This module handles all database operations, including:
//! - Schema bootstrap for the catalog table
//! - Insert-or-ignore batch writes keyed on (title, price)
//! - The `StoreConnector` factory handed to every page task
//!
//! Two backends are supported: PostgreSQL for production and SQLite for local
//! runs and tests.

mod error;
mod postgres;
mod schema;
mod sqlite;
mod writer;

pub use error::{StorageError, StorageResult};
pub use postgres::PostgresStore;
pub use schema::TABLE_NAME;
pub use sqlite::SqliteStore;
pub use writer::{write_records, WriteOutcome};

use crate::catalog::NormalizedRecord;
use crate::config::{PostgresConfig, StoreConfig};
use std::path::PathBuf;

/// Opens scoped connections to the configured store
///
/// Holds settings only. Every call opens its own connection, does its work in
/// at most one transaction and closes the connection again, so tasks never
/// share a connection and the database arbitrates concurrent writes.
#[derive(Debug, Clone)]
pub enum StoreConnector {
    Postgres(PostgresConfig),
    Sqlite { path: PathBuf },
}

impl StoreConnector {
    /// Builds a connector from configuration
    pub fn from_config(config: &StoreConfig) -> Self {
        match config {
            StoreConfig::Postgres(pg) => Self::Postgres(pg.clone()),
            StoreConfig::Sqlite { path } => Self::Sqlite { path: path.clone() },
        }
    }

    /// Human-readable target for logs (never includes credentials)
    pub fn describe(&self) -> String {
        match self {
            Self::Postgres(pg) => format!("postgres://{}:{}/{}", pg.host, pg.port, pg.database),
            Self::Sqlite { path } => format!("sqlite:{}", path.display()),
        }
    }

    /// Creates the catalog table if it does not exist
    pub async fn bootstrap(&self) -> StorageResult<()> {
        match self {
            Self::Postgres(pg) => PostgresStore::connect(pg).await?.bootstrap().await,
            Self::Sqlite { path } => {
                let path = path.clone();
                run_blocking(move || SqliteStore::open(&path)?.bootstrap()).await
            }
        }
    }

    /// Writes one batch in a single transaction
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Rows inserted; conflicting (title, price) rows count zero
    /// * `Err(StorageError)` - The batch was rolled back
    pub async fn insert_batch(&self, records: Vec<NormalizedRecord>) -> StorageResult<u64> {
        match self {
            Self::Postgres(pg) => {
                let mut store = PostgresStore::connect(pg).await?;
                store.insert_batch(&records).await
            }
            Self::Sqlite { path } => {
                let path = path.clone();
                run_blocking(move || SqliteStore::open(&path)?.insert_batch(&records)).await
            }
        }
    }

    /// Counts rows in the catalog table
    pub async fn count_rows(&self) -> StorageResult<u64> {
        match self {
            Self::Postgres(pg) => PostgresStore::connect(pg).await?.count_rows().await,
            Self::Sqlite { path } => {
                let path = path.clone();
                run_blocking(move || SqliteStore::open(&path)?.count_rows()).await
            }
        }
    }
}

/// Runs blocking SQLite work off the async worker threads
async fn run_blocking<T, F>(work: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
}
