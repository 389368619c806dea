//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation. There is one database per
//! server the user is signed in to.

use std::path::{Path, PathBuf};

use huddle_shared::constants::MAX_LOOKUP_CHUNK;
use huddle_shared::types::Table;
use rusqlite::{params, params_from_iter, Connection};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database of `server_url` inside the configured
    /// data directory.
    pub fn open(config: &StoreConfig, server_url: &str) -> Result<Self> {
        let db_path = config.database_path(server_url)?;
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!(server = %server_url, path = %db_path.display(), "opening database");

        Self::open_at(&db_path, config)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(path: &Path, config: &StoreConfig) -> Result<Self> {
        let conn = Connection::open(path)?;

        let mode: String = conn.pragma_update_and_check(
            None,
            "journal_mode",
            &config.journal_mode,
            |row| row.get(0),
        )?;
        tracing::debug!(journal_mode = %mode, "journal mode set");

        Self::init(conn, config)
    }

    /// Open a private in-memory database. Nothing survives the handle.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, &StoreConfig::default())
    }

    fn init(conn: Connection, config: &StoreConfig) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(config.busy_timeout)?;

        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return a mutable reference to the underlying connection.
    ///
    /// Needed to open a transaction.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }

    /// Number of rows currently stored in `table`.
    pub fn count(&self, table: Table) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Run `select` once per chunk of `values`, appending
/// `WHERE {column} IN (...)`, and collect every mapped row.
///
/// `select` must be a bare `SELECT ... FROM table` without a WHERE clause.
pub(crate) fn fetch_where_in<T, F>(
    conn: &Connection,
    select: &str,
    column: &str,
    values: &[String],
    map: F,
) -> Result<Vec<T>>
where
    F: Fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut out = Vec::new();
    for chunk in values.chunks(MAX_LOOKUP_CHUNK) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!("{select} WHERE {column} IN ({placeholders})");
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), &map)?;
        for row in rows {
            out.push(row?);
        }
    }
    Ok(out)
}

/// Permanently delete one row by primary key. Returns `true` if a row went.
pub(crate) fn delete_by_id(conn: &Connection, table: Table, id: &str) -> rusqlite::Result<bool> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", table.as_str());
    let affected = conn.execute(&sql, params![id])?;
    Ok(affected > 0)
}

/// Decode a JSON text column, treating NULL as `Value::Null`.
pub(crate) fn json_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<serde_json::Value> {
    let text: Option<String> = row.get(idx)?;
    match text {
        None => Ok(serde_json::Value::Null),
        Some(text) => serde_json::from_str(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open_at(&path, &StoreConfig::default()).expect("should open");
        assert!(db.path().is_some());
        assert_eq!(db.count(Table::Channel).unwrap(), 0);
    }

    #[test]
    fn open_by_server_url_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            data_dir: Some(dir.path().join("nested")),
            ..StoreConfig::default()
        };

        let db = Database::open(&config, "https://chat.example.com").expect("should open");
        let path = db.path().unwrap();
        assert!(path.starts_with(dir.path().join("nested")));
    }

    #[test]
    fn every_table_exists() {
        let db = Database::open_in_memory().unwrap();
        for table in Table::ALL {
            assert_eq!(db.count(table).unwrap(), 0, "{table}");
        }
    }
}
