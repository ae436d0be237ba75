use crate::error::CoreError;
use crate::model::Checkpoint;

use super::normalize::{canonical_timestamp, normalize_newlines};
use super::preimage::Preimage;

/// Compute the deterministic SHA-256 hash of a checkpoint.
///
/// Preimage key order: `project`, `created_at`, `summary`,
/// `artifact_ids`, then `previous_checkpoint_id` only when non-empty.
/// The `hash` field itself never participates.
pub fn hash_checkpoint(checkpoint: &Checkpoint) -> Result<String, CoreError> {
    let project = normalize_newlines(checkpoint.project.trim());
    if project.is_empty() {
        return Err(CoreError::Validation(
            "project is required for hashing".into(),
        ));
    }
    let summary = normalize_newlines(checkpoint.summary.trim());
    if summary.is_empty() {
        return Err(CoreError::Validation(
            "summary is required for hashing".into(),
        ));
    }
    if checkpoint.created_at.is_empty() {
        return Err(CoreError::Validation(
            "created_at is required for hashing".into(),
        ));
    }
    let created_at = canonical_timestamp(&checkpoint.created_at)
        .map_err(|_| CoreError::Validation("created_at must be RFC3339".into()))?;

    // Defaults to an empty list, never null.
    let artifact_ids: Vec<String> = checkpoint
        .artifact_ids
        .iter()
        .map(|id| normalize_newlines(id))
        .collect();
    let artifact_json = serde_json::to_string(&artifact_ids)?;

    let mut preimage = Preimage::new();
    preimage.string_field("project", &project);
    preimage.string_field("created_at", &created_at);
    preimage.string_field("summary", &summary);
    preimage.raw_field("artifact_ids", &artifact_json);
    let previous = normalize_newlines(checkpoint.previous_id());
    if !previous.is_empty() {
        preimage.string_field("previous_checkpoint_id", &previous);
    }

    Ok(preimage.digest())
}
