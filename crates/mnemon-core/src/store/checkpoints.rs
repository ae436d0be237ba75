use rusqlite::{OptionalExtension, Row, TransactionBehavior};

use crate::error::CoreError;
use crate::hash::{hash_checkpoint, now_utc};
use crate::model::Checkpoint;

use super::LedgerStore;

const CHECKPOINT_COLUMNS: &str =
    "hash, project, summary, created_at, artifact_ids, previous_checkpoint_id";

impl LedgerStore {
    /// Create a checkpoint chained to the project's current latest one.
    ///
    /// The read-latest-then-insert sequence runs inside one IMMEDIATE
    /// transaction so two concurrent creations cannot both observe the
    /// same previous hash and fork the chain.
    pub fn create_checkpoint(
        &self,
        project: &str,
        summary: &str,
        artifact_ids: Vec<String>,
    ) -> Result<Checkpoint, CoreError> {
        let project = project.trim().to_string();
        if project.is_empty() {
            return Err(CoreError::Validation("project is required".into()));
        }
        let summary = summary.trim().to_string();
        if summary.is_empty() {
            return Err(CoreError::Validation("summary is required".into()));
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let exists: i64 = tx.query_row(
                "SELECT COUNT(1) FROM projects WHERE name = ?1",
                [&project],
                |row| row.get(0),
            )?;
            if exists == 0 {
                return Err(CoreError::ProjectNotFound(project));
            }

            let previous: Option<String> = tx
                .query_row(
                    "SELECT hash FROM checkpoints WHERE project = ?1
                     ORDER BY created_at DESC LIMIT 1",
                    [&project],
                    |row| row.get(0),
                )
                .optional()?;

            let mut checkpoint = Checkpoint {
                project,
                summary,
                created_at: now_utc(),
                artifact_ids,
                previous_checkpoint_id: previous.filter(|p| !p.is_empty()),
                hash: String::new(),
            };
            checkpoint.hash = hash_checkpoint(&checkpoint)?;

            let artifact_json = serde_json::to_string(&checkpoint.artifact_ids)?;
            tx.execute(
                "INSERT INTO checkpoints (hash, project, summary, created_at, artifact_ids, previous_checkpoint_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (
                    &checkpoint.hash,
                    &checkpoint.project,
                    &checkpoint.summary,
                    &checkpoint.created_at,
                    &artifact_json,
                    checkpoint.previous_checkpoint_id.as_deref(),
                ),
            )
            .map_err(|err| {
                if CoreError::is_unique_violation(&err) {
                    CoreError::AlreadyExists(checkpoint.hash.clone())
                } else {
                    err.into()
                }
            })?;

            tx.commit()?;
            Ok(checkpoint)
        })
    }

    /// All checkpoints for a project, newest first. Unknown projects fail
    /// with ProjectNotFound.
    pub fn list_checkpoints(&self, project: &str) -> Result<Vec<Checkpoint>, CoreError> {
        let project = project.trim();
        if project.is_empty() {
            return Err(CoreError::Validation("project is required".into()));
        }
        if !self.project_exists(project)? {
            return Err(CoreError::ProjectNotFound(project.to_string()));
        }
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHECKPOINT_COLUMNS} FROM checkpoints
                 WHERE project = ?1 ORDER BY created_at DESC"
            ))?;
            let mapped = stmt.query_map([project], row_to_checkpoint)?;
            Ok(mapped.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    /// The project's most recent checkpoint, by greatest `created_at`.
    pub fn latest_checkpoint(&self, project: &str) -> Result<Checkpoint, CoreError> {
        let project = project.trim();
        if project.is_empty() {
            return Err(CoreError::Validation("project is required".into()));
        }
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {CHECKPOINT_COLUMNS} FROM checkpoints
                     WHERE project = ?1 ORDER BY created_at DESC LIMIT 1"
                ),
                [project],
                row_to_checkpoint,
            )
            .optional()?
            .ok_or_else(|| CoreError::CheckpointNotFound(project.to_string()))
        })
    }

    /// A project's checkpoints with their insertion sequence, ascending by
    /// `(created_at, rowid)`, for chronological merging.
    pub fn checkpoint_rows_ascending(
        &self,
        project: &str,
    ) -> Result<Vec<(i64, Checkpoint)>, CoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT rowid, {CHECKPOINT_COLUMNS} FROM checkpoints
                 WHERE project = ?1 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let mapped = stmt.query_map([project], |row| {
                let rowid: i64 = row.get(0)?;
                Ok((rowid, row_to_checkpoint_offset(row, 1)?))
            })?;
            Ok(mapped.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }
}

fn row_to_checkpoint(row: &Row<'_>) -> rusqlite::Result<Checkpoint> {
    row_to_checkpoint_offset(row, 0)
}

fn row_to_checkpoint_offset(row: &Row<'_>, offset: usize) -> rusqlite::Result<Checkpoint> {
    let artifact_text: String = row.get(offset + 4)?;
    let artifact_ids = if artifact_text.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(&artifact_text).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 4,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })?
    };
    let previous: Option<String> = row.get(offset + 5)?;
    Ok(Checkpoint {
        hash: row.get(offset)?,
        project: row.get(offset + 1)?,
        summary: row.get(offset + 2)?,
        created_at: row.get(offset + 3)?,
        artifact_ids,
        previous_checkpoint_id: previous.filter(|p| !p.is_empty()),
    })
}
