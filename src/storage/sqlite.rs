//! SQLite storage implementation
//!
//! Each `SqliteStore` owns one connection. The pool opens a fresh store per
//! page task, so concurrent writers contend only on SQLite's file lock.

use crate::catalog::{NormalizedRecord, TIMESTAMP_FORMAT};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::{initialize_schema, SQLITE_INSERT_SQL, TABLE_NAME};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::path::Path;
use std::time::Duration;

/// How long a writer waits for the file lock before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`
    ///
    /// The schema is not touched; call `bootstrap` once per run for that.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database with the schema applied (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Creates the catalog table if it does not exist
    pub fn bootstrap(&self) -> StorageResult<()> {
        initialize_schema(&self.conn)?;
        Ok(())
    }

    /// Inserts all records in one transaction, skipping (title, price) conflicts
    ///
    /// Returns the number of rows actually inserted. On error nothing from this
    /// batch is kept: the transaction rolls back when dropped uncommitted.
    pub fn insert_batch(&mut self, records: &[NormalizedRecord]) -> StorageResult<u64> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0u64;

        {
            let mut stmt = tx.prepare(SQLITE_INSERT_SQL)?;
            for record in records {
                let changed = stmt.execute(params![
                    record.title,
                    record.rating_label,
                    record.category,
                    record.price,
                    record.stock_status,
                    record.observed_at.format(TIMESTAMP_FORMAT).to_string(),
                ])?;
                inserted += changed as u64;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    /// Counts rows in the catalog table
    pub fn count_rows(&self) -> StorageResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", TABLE_NAME);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Loads every stored record ordered by insertion
    pub fn load_records(&self) -> StorageResult<Vec<NormalizedRecord>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT titulo, classificacao, categoria, preco, estoque, "timestamp"
               FROM "LIVROS_ESTOQUE" ORDER BY id"#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (title, rating_label, category, price, stock_status, timestamp) = row?;
            let observed_at = NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT)
                .map_err(|e| {
                    StorageError::Serialization(format!("bad timestamp {:?}: {}", timestamp, e))
                })?;
            records.push(NormalizedRecord {
                title,
                rating_label,
                category,
                price,
                stock_status,
                observed_at,
            });
        }

        Ok(records)
    }
}
