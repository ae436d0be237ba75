use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flat string-to-string metadata attached to an intent. A `BTreeMap`
/// keeps key order deterministic for hashing and storage.
pub type Meta = BTreeMap<String, String>;

/// The `meta` key that associates an intent with a project, by convention.
pub const META_PROJECT_KEY: &str = "project";

/// A unique identifier for an intent record.
/// Generated as UUID v4 hex (no dashes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentId(pub String);

impl IntentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().as_simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for IntentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for IntentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IntentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IntentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An atomic prompt/response capture, the base unit of the ledger.
///
/// `created_at` carries the canonical RFC3339 UTC text verbatim; it is
/// hashed, stored as TEXT and compared lexicographically, so the record
/// never re-formats it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentRecord {
    pub id: String,
    pub created_at: String,
    pub author: String,
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub prompt: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_hash: Option<String>,
    pub hash: String,
}

impl IntentRecord {
    /// The project this intent belongs to, by the `meta.project` convention.
    pub fn project(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|m| m.get(META_PROJECT_KEY))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Reserved source types mark non-capture "event" records.
    pub fn is_event(&self) -> bool {
        matches!(
            self.source_type.trim().to_ascii_lowercase().as_str(),
            "meta-command" | "meta_command" | "event"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_id_generation() {
        let id = IntentId::new();
        assert_eq!(id.as_str().len(), 32); // UUID v4 hex, no dashes
    }

    #[test]
    fn test_project_convention_key() {
        let mut meta = Meta::new();
        meta.insert("project".into(), "  alpha  ".into());
        let record = IntentRecord {
            id: "i1".into(),
            created_at: "2026-01-01T00:00:00.000000000Z".into(),
            author: "ada".into(),
            source_type: "cli".into(),
            title: None,
            prompt: "p".into(),
            response: "r".into(),
            meta: Some(meta),
            prev_hash: None,
            hash: String::new(),
        };
        assert_eq!(record.project(), Some("alpha"));
    }

    #[test]
    fn test_event_source_types() {
        let mut record = IntentRecord {
            id: "i1".into(),
            created_at: "2026-01-01T00:00:00.000000000Z".into(),
            author: "ada".into(),
            source_type: "cli".into(),
            title: None,
            prompt: "p".into(),
            response: "r".into(),
            meta: None,
            prev_hash: None,
            hash: String::new(),
        };
        assert!(!record.is_event());
        for source in ["meta-command", "meta_command", "event", " Event "] {
            record.source_type = source.into();
            assert!(record.is_event(), "{source} should mark an event record");
        }
    }

    #[test]
    fn test_serde_omits_empty_optionals() {
        let record = IntentRecord {
            id: "i1".into(),
            created_at: "2026-01-01T00:00:00.000000000Z".into(),
            author: "ada".into(),
            source_type: "cli".into(),
            title: None,
            prompt: "p".into(),
            response: "r".into(),
            meta: None,
            prev_hash: None,
            hash: "h".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("title"));
        assert!(!json.contains("meta"));
        assert!(!json.contains("prev_hash"));
    }
}
