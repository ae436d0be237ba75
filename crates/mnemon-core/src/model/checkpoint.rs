use serde::{Deserialize, Serialize};

/// An immutable snapshot marker for a project. Checkpoints for a project
/// form a singly linked list through `previous_checkpoint_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Checkpoint {
    pub project: String,
    pub summary: String,
    pub created_at: String,
    #[serde(default)]
    pub artifact_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_checkpoint_id: Option<String>,
    pub hash: String,
}

impl Checkpoint {
    /// The previous checkpoint hash, or "" for the first in a chain.
    pub fn previous_id(&self) -> &str {
        self.previous_checkpoint_id.as_deref().unwrap_or("")
    }
}
