use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row};
use tracing::warn;

use crate::error::CoreError;
use crate::model::{IntentRecord, Meta};

use super::{LedgerStore, ListOptions, DEFAULT_LIST_LIMIT};

const INTENT_COLUMNS: &str =
    "id, created_at, author, source_type, title, prompt, response, meta, prev_hash, hash";

impl LedgerStore {
    /// Insert a new intent. Fails with AlreadyExists when the id is taken;
    /// never overwrites.
    pub fn create_intent(&self, record: &IntentRecord) -> Result<(), CoreError> {
        let meta_text = record
            .meta
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO intents (id, created_at, author, source_type, title, prompt, response, meta, prev_hash, hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                (
                    &record.id,
                    &record.created_at,
                    &record.author,
                    &record.source_type,
                    record.title.as_deref().filter(|t| !t.is_empty()),
                    &record.prompt,
                    &record.response,
                    meta_text.as_deref(),
                    record.prev_hash.as_deref().filter(|h| !h.is_empty()),
                    &record.hash,
                ),
            )
            .map_err(|err| {
                if CoreError::is_unique_violation(&err) {
                    CoreError::AlreadyExists(record.id.clone())
                } else {
                    err.into()
                }
            })?;
            Ok(())
        })
    }

    /// Look up an intent by its primary id.
    pub fn get_intent(&self, id: &str) -> Result<IntentRecord, CoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {INTENT_COLUMNS} FROM intents WHERE id = ?1"),
                [id],
                row_to_intent,
            )
            .optional()?
            .ok_or_else(|| CoreError::IntentNotFound(id.to_string()))
        })
    }

    /// Look up an intent by its content hash.
    pub fn get_intent_by_hash(&self, hash: &str) -> Result<IntentRecord, CoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {INTENT_COLUMNS} FROM intents WHERE hash = ?1 LIMIT 1"),
                [hash],
                row_to_intent,
            )
            .optional()?
            .ok_or_else(|| CoreError::IntentNotFound(hash.to_string()))
        })
    }

    /// List intents newest-first, ties broken by insertion order.
    ///
    /// Filters are applied after the fetch; when any filter is present the
    /// store over-fetches before filtering so a small limit still yields
    /// matches from deeper in the ledger.
    pub fn list_intents(&self, opts: &ListOptions) -> Result<Vec<IntentRecord>, CoreError> {
        let limit = opts.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(1);
        let has_filters =
            opts.author.is_some() || opts.source.is_some() || !opts.meta.is_empty();
        let fetch_limit = if has_filters {
            limit.saturating_mul(5).max(100)
        } else {
            limit
        };

        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {INTENT_COLUMNS} FROM intents
                 ORDER BY created_at DESC, rowid DESC LIMIT ?1"
            ))?;
            let fetch_limit = i64::try_from(fetch_limit).unwrap_or(i64::MAX);
            let mapped = stmt.query_map([fetch_limit], row_to_intent)?;
            Ok(mapped.collect::<rusqlite::Result<Vec<_>>>()?)
        })?;

        let mut filtered: Vec<IntentRecord> = rows
            .into_iter()
            .filter(|record| {
                if let Some(author) = &opts.author {
                    if &record.author != author {
                        return false;
                    }
                }
                if let Some(source) = &opts.source {
                    if &record.source_type != source {
                        return false;
                    }
                }
                meta_matches(record.meta.as_ref(), &opts.meta)
            })
            .collect();
        filtered.truncate(limit);
        Ok(filtered)
    }

    /// Intents created strictly after `created_after` that belong to the
    /// project by the `meta.project` convention, ascending by
    /// `(created_at, id)`. Rows whose meta fails to decode are skipped
    /// with a warning; any other conversion failure is an error.
    pub fn intents_since(
        &self,
        project: &str,
        created_after: &str,
    ) -> Result<Vec<IntentRecord>, CoreError> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {INTENT_COLUMNS} FROM intents
                 WHERE created_at > ?1 ORDER BY created_at ASC, id ASC"
            ))?;
            let mapped = stmt.query_map([created_after], |row| lossy_row_to_intent(row, 0))?;
            Ok(mapped.collect::<rusqlite::Result<Vec<_>>>()?)
        })?;
        Ok(rows
            .into_iter()
            .flatten()
            .filter(|record| record.project() == Some(project))
            .collect())
    }

    /// All intents with their insertion sequence, ascending by
    /// `(created_at, rowid)`, for chronological merging. Rows whose meta
    /// fails to decode are skipped with a warning; any other conversion
    /// failure is an error.
    pub fn intent_rows_ascending(&self) -> Result<Vec<(i64, IntentRecord)>, CoreError> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT rowid, {INTENT_COLUMNS} FROM intents
                 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let mapped = stmt.query_map([], |row| {
                let rowid: i64 = row.get(0)?;
                Ok((rowid, lossy_row_to_intent(row, 1)?))
            })?;
            Ok(mapped.collect::<rusqlite::Result<Vec<_>>>()?)
        })?;
        Ok(rows
            .into_iter()
            .filter_map(|(rowid, record)| record.map(|record| (rowid, record)))
            .collect())
    }
}

/// Convert a row, treating only a malformed meta column as skippable
/// (`Ok(None)`). Every other conversion failure is genuine storage
/// corruption and propagates.
fn lossy_row_to_intent(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<IntentRecord>> {
    match row_to_intent_offset(row, offset) {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::FromSqlConversionFailure(index, _, err)) if index == offset + 7 => {
            let id: String = row.get(offset)?;
            warn!("skipping intent {id}: malformed meta: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// True when the record's meta contains every filter pair exactly.
fn meta_matches(meta: Option<&Meta>, filters: &Meta) -> bool {
    if filters.is_empty() {
        return true;
    }
    let Some(meta) = meta else { return false };
    filters
        .iter()
        .all(|(key, value)| meta.get(key) == Some(value))
}

fn row_to_intent(row: &Row<'_>) -> rusqlite::Result<IntentRecord> {
    row_to_intent_offset(row, 0)
}

fn row_to_intent_offset(row: &Row<'_>, offset: usize) -> rusqlite::Result<IntentRecord> {
    let meta_text: Option<String> = row.get(offset + 7)?;
    let meta = match meta_text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Some(serde_json::from_str::<Meta>(text).map_err(
            |err| rusqlite::Error::FromSqlConversionFailure(offset + 7, Type::Text, Box::new(err)),
        )?),
        _ => None,
    };
    Ok(IntentRecord {
        id: row.get(offset)?,
        created_at: row.get(offset + 1)?,
        author: row.get(offset + 2)?,
        source_type: row.get(offset + 3)?,
        title: row.get(offset + 4)?,
        prompt: row.get(offset + 5)?,
        response: row.get(offset + 6)?,
        meta,
        prev_hash: row.get(offset + 8)?,
        hash: row.get(offset + 9)?,
    })
}
