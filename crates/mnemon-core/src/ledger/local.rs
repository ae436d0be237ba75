//! Ledger backend over the local SQLite store.

use std::path::Path;

use crate::chain::{resolve_chain, ChainReport};
use crate::error::CoreError;
use crate::hash::{hash_intent, now_utc};
use crate::model::{Checkpoint, IntentId, IntentRecord, Project};
use crate::store::{LedgerStore, ListOptions};
use crate::verify::{verify_intent, VerifyReport};

use super::{Ledger, NewIntent};

pub struct LocalLedger {
    store: LedgerStore,
}

impl LocalLedger {
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        Ok(Self {
            store: LedgerStore::open(path)?,
        })
    }

    pub fn in_memory() -> Result<Self, CoreError> {
        Ok(Self {
            store: LedgerStore::open_in_memory()?,
        })
    }

    /// Direct store access, for operations beyond the backend contract
    /// (rehydration, timeline export).
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }
}

impl Ledger for LocalLedger {
    fn create_intent(&self, new: NewIntent) -> Result<IntentRecord, CoreError> {
        let author = new.author.trim().to_string();
        if author.is_empty() {
            return Err(CoreError::Validation("author is required".into()));
        }
        if new.response.trim().is_empty() {
            return Err(CoreError::Validation("response is required".into()));
        }
        let source_type = match new.source_type.trim() {
            "" => "cli".to_string(),
            s => s.to_string(),
        };

        let mut record = IntentRecord {
            id: IntentId::new().to_string(),
            created_at: now_utc(),
            author,
            source_type,
            title: new.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            prompt: new.prompt,
            response: new.response,
            meta: new.meta.filter(|m| !m.is_empty()),
            prev_hash: new.prev_hash.filter(|h| !h.is_empty()),
            hash: String::new(),
        };
        record.hash = hash_intent(&record)?;

        self.store.create_intent(&record)?;
        Ok(record)
    }

    fn get_intent(&self, id: &str) -> Result<IntentRecord, CoreError> {
        self.store.get_intent(id)
    }

    fn list_intents(&self, opts: &ListOptions) -> Result<Vec<IntentRecord>, CoreError> {
        self.store.list_intents(opts)
    }

    fn verify_intent(&self, id: &str) -> Result<VerifyReport, CoreError> {
        verify_intent(&self.store, id)
    }

    fn chain_intent(&self, id: &str) -> Result<ChainReport, CoreError> {
        resolve_chain(&self.store, id)
    }

    fn create_project(&self, name: &str, description: &str) -> Result<Project, CoreError> {
        self.store.create_project(name, description)
    }

    fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        self.store.list_projects()
    }

    fn create_checkpoint(
        &self,
        project: &str,
        summary: &str,
        artifact_ids: Vec<String>,
    ) -> Result<Checkpoint, CoreError> {
        self.store.create_checkpoint(project, summary, artifact_ids)
    }

    fn list_checkpoints(&self, project: &str) -> Result<Vec<Checkpoint>, CoreError> {
        self.store.list_checkpoints(project)
    }
}
