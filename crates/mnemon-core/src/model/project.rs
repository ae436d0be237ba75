use serde::{Deserialize, Serialize};

/// A named project namespace. Intents belong to a project only by the
/// `meta.project` convention; there is no foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
}
