//! Versioned schema migrations. Each migration is applied once inside a
//! transaction that also records its version in `schema_migrations`;
//! re-running against a migrated store is a no-op.

use rusqlite::Connection;
use tracing::info;

use crate::error::CoreError;
use crate::hash::now_utc;

const SCHEMA_MIGRATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TEXT NOT NULL
);";

const INTENTS_SQL: &str = "CREATE TABLE IF NOT EXISTS intents (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    author TEXT NOT NULL,
    source_type TEXT NOT NULL,
    title TEXT,
    prompt TEXT NOT NULL,
    response TEXT NOT NULL,
    meta TEXT,
    prev_hash TEXT,
    hash TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_intents_hash ON intents(hash);
CREATE INDEX IF NOT EXISTS idx_intents_created_at ON intents(created_at);";

const PROJECTS_SQL: &str = "CREATE TABLE IF NOT EXISTS projects (
    name TEXT PRIMARY KEY,
    description TEXT,
    created_at TEXT NOT NULL,
    prev_hash TEXT,
    hash TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_projects_created_at ON projects(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_projects_prev_hash ON projects(prev_hash);";

const CHECKPOINTS_SQL: &str = "CREATE TABLE IF NOT EXISTS checkpoints (
    hash TEXT PRIMARY KEY,
    project TEXT NOT NULL,
    summary TEXT NOT NULL,
    created_at TEXT NOT NULL,
    artifact_ids TEXT NOT NULL,
    previous_checkpoint_id TEXT
);
CREATE INDEX IF NOT EXISTS idx_checkpoints_project_created_at
    ON checkpoints(project, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_checkpoints_previous_id
    ON checkpoints(previous_checkpoint_id);";

/// Migrations in apply order. Versions sort lexicographically.
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("0001_intents.sql", INTENTS_SQL),
    ("0002_projects.sql", PROJECTS_SQL),
    ("0003_checkpoints.sql", CHECKPOINTS_SQL),
];

/// Apply all pending migrations.
pub fn migrate(conn: &mut Connection) -> Result<(), CoreError> {
    conn.execute_batch(SCHEMA_MIGRATIONS_TABLE)?;

    for (version, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        info!("applying migration {version}");
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            (version, now_utc()),
        )?;
        tx.commit()?;
    }

    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool, CoreError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(1) FROM schema_migrations WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
