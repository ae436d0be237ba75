//! Rehydration: answer "what has happened in this project since its
//! last checkpoint."

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Checkpoint, IntentRecord};
use crate::store::LedgerStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehydrateReport {
    pub project: String,
    pub latest_checkpoint: Checkpoint,
    pub intents_since: Vec<IntentRecord>,
}

/// Find the project's latest checkpoint and every intent created strictly
/// after it that belongs to the project, ascending by `(created_at, id)`.
pub fn rehydrate_project(store: &LedgerStore, project: &str) -> Result<RehydrateReport, CoreError> {
    let project = project.trim();
    if project.is_empty() {
        return Err(CoreError::Validation("project is required".into()));
    }
    if !store.project_exists(project)? {
        return Err(CoreError::ProjectNotFound(project.to_string()));
    }

    let latest_checkpoint = store.latest_checkpoint(project)?;
    let intents_since = store.intents_since(project, &latest_checkpoint.created_at)?;

    Ok(RehydrateReport {
        project: project.to_string(),
        latest_checkpoint,
        intents_since,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_intent;
    use crate::model::Meta;

    fn capture(store: &LedgerStore, id: &str, created_at: &str, project: &str) {
        let mut meta = Meta::new();
        meta.insert("project".into(), project.into());
        let mut r = IntentRecord {
            id: id.into(),
            created_at: created_at.into(),
            author: "ada".into(),
            source_type: "cli".into(),
            title: None,
            prompt: "p".into(),
            response: "r".into(),
            meta: Some(meta),
            prev_hash: None,
            hash: String::new(),
        };
        r.hash = hash_intent(&r).unwrap();
        store.create_intent(&r).unwrap();
    }

    #[test]
    fn test_rehydrate_returns_only_intents_after_checkpoint() {
        let store = LedgerStore::open_in_memory().unwrap();
        store.create_project("alpha", "").unwrap();

        capture(&store, "early", "2020-01-01T00:00:00.000000000Z", "alpha");
        let checkpoint = store.create_checkpoint("alpha", "first", Vec::new()).unwrap();
        // Strictly after the checkpoint.
        let later = "2999-01-01T00:00:00.000000000Z";
        capture(&store, "late", later, "alpha");
        capture(&store, "other", later, "beta");

        let report = rehydrate_project(&store, "alpha").unwrap();
        assert_eq!(report.latest_checkpoint.summary, checkpoint.summary);
        let ids: Vec<&str> = report.intents_since.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["late"]);
    }

    #[test]
    fn test_rehydrate_empty_when_nothing_follows() {
        let store = LedgerStore::open_in_memory().unwrap();
        store.create_project("alpha", "").unwrap();
        capture(&store, "early", "2020-01-01T00:00:00.000000000Z", "alpha");
        store.create_checkpoint("alpha", "first", Vec::new()).unwrap();

        let report = rehydrate_project(&store, "alpha").unwrap();
        assert!(report.intents_since.is_empty());
    }

    #[test]
    fn test_rehydrate_without_checkpoint_fails() {
        let store = LedgerStore::open_in_memory().unwrap();
        store.create_project("alpha", "").unwrap();
        assert!(matches!(
            rehydrate_project(&store, "alpha"),
            Err(CoreError::CheckpointNotFound(_))
        ));
    }

    #[test]
    fn test_rehydrate_unknown_project_is_project_not_found() {
        let store = LedgerStore::open_in_memory().unwrap();
        assert!(matches!(
            rehydrate_project(&store, "ghost"),
            Err(CoreError::ProjectNotFound(_))
        ));
    }
}
