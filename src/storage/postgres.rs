//! PostgreSQL storage implementation
//!
//! Uses `tokio-postgres`; the connection driver runs on its own task and ends
//! when the store (and with it the client) is dropped.

use crate::catalog::NormalizedRecord;
use crate::config::PostgresConfig;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::{POSTGRES_INSERT_SQL, POSTGRES_SCHEMA_SQL, TABLE_NAME};
use tokio_postgres::{Client, NoTls};

/// PostgreSQL storage backend
pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    /// Opens a new connection
    pub async fn connect(config: &PostgresConfig) -> StorageResult<Self> {
        let (client, connection) = tokio_postgres::connect(&config.connection_string(), NoTls)
            .await
            .map_err(|e| {
                StorageError::Connection(format!(
                    "failed to connect to {}:{}/{}: {}",
                    config.host, config.port, config.database, e
                ))
            })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("postgres connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    /// Creates the catalog table if it does not exist
    pub async fn bootstrap(&self) -> StorageResult<()> {
        self.client.batch_execute(POSTGRES_SCHEMA_SQL).await?;
        Ok(())
    }

    /// Inserts all records in one transaction, skipping (title, price) conflicts
    ///
    /// Returns the number of rows actually inserted. The transaction rolls back
    /// if any statement fails.
    pub async fn insert_batch(&mut self, records: &[NormalizedRecord]) -> StorageResult<u64> {
        let tx = self.client.transaction().await?;
        let stmt = tx.prepare(POSTGRES_INSERT_SQL).await?;

        let mut inserted = 0u64;
        for record in records {
            inserted += tx
                .execute(
                    &stmt,
                    &[
                        &record.title,
                        &record.rating_label,
                        &record.category,
                        &record.price,
                        &record.stock_status,
                        &record.observed_at,
                    ],
                )
                .await?;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Counts rows in the catalog table
    pub async fn count_rows(&self) -> StorageResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", TABLE_NAME);
        let row = self.client.query_one(sql.as_str(), &[]).await?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }
}
