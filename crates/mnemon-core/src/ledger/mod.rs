//! The backend contract: one trait covering every ledger operation, with
//! a local SQLite implementation here and an HTTP client elsewhere.

pub mod local;

pub use local::LocalLedger;

use crate::chain::ChainReport;
use crate::error::CoreError;
use crate::model::{Checkpoint, IntentRecord, Meta, Project};
use crate::store::ListOptions;
use crate::verify::VerifyReport;

/// Input for creating an intent. Identity, timestamp and hash are
/// assigned by the backend.
#[derive(Debug, Clone, Default)]
pub struct NewIntent {
    pub author: String,
    pub source_type: String,
    pub title: Option<String>,
    pub prompt: String,
    pub response: String,
    pub meta: Option<Meta>,
    pub prev_hash: Option<String>,
}

/// Everything a ledger backend must support. Both the local store and
/// the remote HTTP client implement this, so callers stay agnostic of
/// where records live.
pub trait Ledger {
    fn create_intent(&self, new: NewIntent) -> Result<IntentRecord, CoreError>;
    fn get_intent(&self, id: &str) -> Result<IntentRecord, CoreError>;
    fn list_intents(&self, opts: &ListOptions) -> Result<Vec<IntentRecord>, CoreError>;
    fn verify_intent(&self, id: &str) -> Result<VerifyReport, CoreError>;
    fn chain_intent(&self, id: &str) -> Result<ChainReport, CoreError>;

    fn create_project(&self, name: &str, description: &str) -> Result<Project, CoreError>;
    fn list_projects(&self) -> Result<Vec<Project>, CoreError>;

    fn create_checkpoint(
        &self,
        project: &str,
        summary: &str,
        artifact_ids: Vec<String>,
    ) -> Result<Checkpoint, CoreError>;
    fn list_checkpoints(&self, project: &str) -> Result<Vec<Checkpoint>, CoreError>;
}
