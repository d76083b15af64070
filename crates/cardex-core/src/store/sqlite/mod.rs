use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{CardexError, Result};

use super::{RecordStore, ScanPage};

mod migration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed store; the default backend for on-disk catalogs.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRecordStore").finish_non_exhaustive()
    }
}

impl SqliteRecordStore {
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CardexError::lock_poisoned("sqlite"))?;
        f(&conn)
    }

    fn with_tx<T>(&self, f: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| CardexError::lock_poisoned("sqlite"))?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        drop(conn);
        Ok(value)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        #[cfg(unix)]
        harden_sqlite_permissions(path)?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }
}

impl RecordStore for SqliteRecordStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                r"
                INSERT INTO kv(key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found = conn.query_row(
                r"
                SELECT EXISTS(SELECT 1 FROM kv WHERE key = ?1)
                    OR EXISTS(SELECT 1 FROM set_members WHERE key = ?1)
                ",
                params![key],
                |row| row.get::<_, bool>(0),
            )?;
            Ok(found)
        })
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
            Ok(affected > 0)
        })
    }

    fn scan_page(
        &self,
        prefix: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<ScanPage> {
        let page_size = page_size.max(1);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT key FROM (
                    SELECT key FROM kv
                    WHERE key >= ?1 AND (?2 IS NULL OR key > ?2)
                    UNION
                    SELECT key FROM set_members
                    WHERE key >= ?1 AND (?2 IS NULL OR key > ?2)
                )
                WHERE substr(key, 1, length(?1)) = ?1
                ORDER BY key ASC
                LIMIT ?3
                ",
            )?;
            let rows = stmt.query_map(
                params![prefix, cursor, usize_to_i64_saturating(page_size)],
                |row| row.get::<_, String>(0),
            )?;

            let mut keys = Vec::with_capacity(page_size);
            for row in rows {
                keys.push(row?);
            }
            let next_cursor = if keys.len() == page_size {
                keys.last().cloned()
            } else {
                None
            };
            Ok(ScanPage { keys, next_cursor })
        })
    }

    fn add_member(&self, key: &str, member: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                "INSERT OR IGNORE INTO set_members(key, member) VALUES (?1, ?2)",
                params![key, member],
            )?;
            Ok(affected > 0)
        })
    }

    fn members(&self, key: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT member FROM set_members WHERE key = ?1 ORDER BY id ASC")?;
            let rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    fn cardinality(&self, key: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM set_members WHERE key = ?1",
                params![key],
                |row| row.get::<_, i64>(0),
            )?;
            Ok(i64_to_usize_saturating(count))
        })
    }

    fn remove_members(&self, key: &str, members: &[String]) -> Result<usize> {
        self.with_tx(|tx| {
            for member in members {
                tx.execute(
                    "DELETE FROM set_members WHERE key = ?1 AND member = ?2",
                    params![key, member],
                )?;
            }
            let remaining = tx.query_row(
                "SELECT COUNT(*) FROM set_members WHERE key = ?1",
                params![key],
                |row| row.get::<_, i64>(0),
            )?;
            Ok(i64_to_usize_saturating(remaining))
        })
    }

    fn delete(&self, key: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM set_members WHERE key = ?1", params![key])?;
            Ok(affected > 0)
        })
    }
}

fn usize_to_i64_saturating(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn i64_to_usize_saturating(value: i64) -> usize {
    if value <= 0 {
        0
    } else {
        usize::try_from(value).unwrap_or(usize::MAX)
    }
}

#[cfg(unix)]
fn harden_sqlite_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    for suffix in ["", "-wal", "-shm"] {
        let mut os = path.as_os_str().to_os_string();
        os.push(suffix);
        let candidate = PathBuf::from(os);
        if candidate.exists() {
            std::fs::set_permissions(candidate, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    Ok(())
}
