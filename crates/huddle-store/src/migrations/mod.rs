//! Database migration runner.
//!
//! Migrations are executed in order on every [`Database::open`] /
//! [`Database::open_at`] call.  Each migration is guarded by a `user_version`
//! pragma so it runs exactly once, and is recorded in `schema_migrations`.
//!
//! [`Database::open`]: crate::Database::open
//! [`Database::open_at`]: crate::Database::open_at

pub mod v001_initial;
pub mod v002_channel_info_reactions;

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};

/// Current schema version.  Bump this and add a new migration module whenever
/// the schema changes.
pub const CURRENT_VERSION: u32 = 2;

/// Run all pending migrations against the open connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::debug!(
        current_version = current,
        target_version = CURRENT_VERSION,
        "checking database migrations"
    );

    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema v{current} is newer than this build (v{CURRENT_VERSION})"
        )));
    }

    if current < 1 {
        tracing::info!("applying migration v001_initial");
        v001_initial::up(conn).map_err(|e| StoreError::Migration(e.to_string()))?;
        record(conn, 1, "v001_initial")?;
    }

    if current < 2 {
        tracing::info!("applying migration v002_channel_info_reactions");
        v002_channel_info_reactions::up(conn).map_err(|e| StoreError::Migration(e.to_string()))?;
        record(conn, 2, "v002_channel_info_reactions")?;
    }

    Ok(())
}

fn record(conn: &Connection, version: u32, name: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_migrations (version, name, applied_at)
         VALUES (?1, ?2, ?3)",
        params![version, name, Utc::now().to_rfc3339()],
    )?;
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, 2);
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn v1_database_is_upgraded() {
        let conn = Connection::open_in_memory().unwrap();
        v001_initial::up(&conn).unwrap();
        record(&conn, 1, "v001_initial").unwrap();

        run_migrations(&conn).unwrap();
        let reactions: i64 = conn
            .query_row("SELECT COUNT(*) FROM Reaction", [], |row| row.get(0))
            .unwrap();
        assert_eq!(reactions, 0);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", CURRENT_VERSION + 1).unwrap();
        assert!(matches!(run_migrations(&conn), Err(StoreError::Migration(_))));
    }
}
