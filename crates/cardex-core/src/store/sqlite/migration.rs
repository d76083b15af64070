use rusqlite::Connection;

use crate::error::{CardexError, Result};

use super::SqliteRecordStore;

const MIGRATION_SCHEMA_SQL: &str = r"
    PRAGMA journal_mode = WAL;
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS set_members (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        key TEXT NOT NULL,
        member TEXT NOT NULL,
        UNIQUE(key, member)
    );

    CREATE INDEX IF NOT EXISTS idx_set_members_key_id ON set_members(key, id);
";

impl SqliteRecordStore {
    pub(super) fn migrate(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(MIGRATION_SCHEMA_SQL)?;
            ensure_required_column(
                conn,
                "set_members",
                "member",
                "unsupported set_members schema: member is missing; reset the index database",
            )?;
            ensure_required_column(
                conn,
                "kv",
                "updated_at",
                "unsupported kv schema: updated_at is missing; reset the index database",
            )?;
            Ok(())
        })
    }
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for row in rows {
        if row? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn ensure_required_column(
    conn: &Connection,
    table: &str,
    column: &str,
    error_message: &'static str,
) -> Result<()> {
    if has_column(conn, table, column)? {
        Ok(())
    } else {
        Err(CardexError::Validation(error_message.to_string()))
    }
}
