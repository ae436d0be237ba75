//! Durable append-only SQLite storage for intents, projects and
//! checkpoints, with lookups by primary key, by hash and ordered
//! listing by creation time.

pub mod checkpoints;
pub mod intents;
pub mod migrations;
pub mod projects;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::debug;

use crate::error::CoreError;
use crate::model::Meta;

/// Default number of records returned by a list call.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Options for listing intents. All filters are exact-match equality;
/// meta filters are AND-combined.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub author: Option<String>,
    pub source: Option<String>,
    pub meta: Meta,
    pub limit: Option<usize>,
}

/// The ledger's persistent store. Owns a single SQLite connection;
/// the engine's write lock serializes concurrent writers.
pub struct LedgerStore {
    conn: Mutex<Connection>,
}

impl LedgerStore {
    /// Open (or create) the ledger database at the given path and apply
    /// any pending schema migrations.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        debug!("opening ledger store at {}", path.display());
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, CoreError> {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.with_conn_mut(migrations::migrate)?;
        Ok(store)
    }

    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let conn = self.conn.lock().map_err(|_| CoreError::LockPoisoned)?;
        f(&conn)
    }

    pub(crate) fn with_conn_mut<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut conn = self.conn.lock().map_err(|_| CoreError::LockPoisoned)?;
        f(&mut conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_schema() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("ledger.db");
        let store = LedgerStore::open(&path).unwrap();
        store
            .with_conn(|conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(1) FROM sqlite_master WHERE type='table'
                     AND name IN ('intents','projects','checkpoints','schema_migrations')",
                    [],
                    |row| row.get(0),
                )?;
                assert_eq!(count, 4);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_reopen_is_a_noop_migration() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("ledger.db");
        drop(LedgerStore::open(&path).unwrap());
        // Second open must tolerate the already-applied schema.
        let store = LedgerStore::open(&path).unwrap();
        store
            .with_conn(|conn| {
                let applied: i64 =
                    conn.query_row("SELECT COUNT(1) FROM schema_migrations", [], |row| {
                        row.get(0)
                    })?;
                assert_eq!(applied as usize, migrations::MIGRATIONS.len());
                Ok(())
            })
            .unwrap();
    }
}
