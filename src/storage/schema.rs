//! Catalog table schema and statements
//!
//! Both backends share one logical table: `"LIVROS_ESTOQUE"` with a uniqueness
//! constraint over `(titulo, preco)`. Writes never update; a conflicting row is
//! silently skipped.

/// Name of the catalog table (quoted, case preserved)
pub const TABLE_NAME: &str = "\"LIVROS_ESTOQUE\"";

/// SQLite schema for the catalog table
pub const SQLITE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "LIVROS_ESTOQUE" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    titulo TEXT NOT NULL,
    classificacao TEXT NOT NULL,
    categoria TEXT NOT NULL,
    preco REAL NOT NULL CHECK (preco >= 0),
    estoque TEXT NOT NULL,
    "timestamp" TEXT NOT NULL,
    UNIQUE (titulo, preco)
);

CREATE INDEX IF NOT EXISTS idx_livros_estoque_categoria ON "LIVROS_ESTOQUE"(categoria);
"#;

/// PostgreSQL schema for the catalog table
pub const POSTGRES_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "LIVROS_ESTOQUE" (
    id SERIAL PRIMARY KEY,
    titulo TEXT NOT NULL,
    classificacao TEXT NOT NULL,
    categoria TEXT NOT NULL,
    preco DOUBLE PRECISION NOT NULL CHECK (preco >= 0),
    estoque TEXT NOT NULL,
    "timestamp" TIMESTAMP NOT NULL,
    CONSTRAINT livros_estoque_titulo_preco_key UNIQUE (titulo, preco)
);

CREATE INDEX IF NOT EXISTS idx_livros_estoque_categoria ON "LIVROS_ESTOQUE"(categoria);
"#;

/// Insert-or-ignore statement, SQLite placeholders
pub const SQLITE_INSERT_SQL: &str = r#"
INSERT INTO "LIVROS_ESTOQUE" (titulo, classificacao, categoria, preco, estoque, "timestamp")
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT (titulo, preco) DO NOTHING
"#;

/// Insert-or-ignore statement, PostgreSQL placeholders
pub const POSTGRES_INSERT_SQL: &str = r#"
INSERT INTO "LIVROS_ESTOQUE" (titulo, classificacao, categoria, preco, estoque, "timestamp")
VALUES ($1, $2, $3, $4, $5, $6)
ON CONFLICT (titulo, preco) DO NOTHING
"#;

/// Initializes the SQLite schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SQLITE_SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::{params, Connection};

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        let result = initialize_schema(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_table_exists_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='LIVROS_ESTOQUE'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_insert_ignores_same_title_and_price() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let insert = |stock: &str| {
            conn.execute(
                SQLITE_INSERT_SQL,
                params!["Book A", "3 stars", "Fiction", 10.0, stock, "2024-01-01 00:00:00"],
            )
            .unwrap()
        };

        assert_eq!(insert("In stock"), 1);
        assert_eq!(insert("Out of stock"), 0);

        let stock: String = conn
            .query_row(r#"SELECT estoque FROM "LIVROS_ESTOQUE""#, [], |row| row.get(0))
            .unwrap();
        assert_eq!(stock, "In stock");
    }

    #[test]
    fn test_rejects_negative_price() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let result = conn.execute(
            SQLITE_INSERT_SQL,
            params!["Book A", "3 stars", "Fiction", -1.0, "In stock", "2024-01-01 00:00:00"],
        );
        assert!(result.is_err());
    }
}
