//! Integrity verification: recompute a stored intent's hash and compare
//! it against the persisted one.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::hash::hash_intent;
use crate::store::LedgerStore;

/// Outcome of verifying one intent. A mismatch is reported here as
/// `valid: false` with both hashes, never as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub id: String,
    pub valid: bool,
    pub stored_hash: String,
    pub computed_hash: String,
    #[serde(default)]
    pub prev_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn verify_intent(store: &LedgerStore, id: &str) -> Result<VerifyReport, CoreError> {
    let record = store.get_intent(id)?;

    let (computed_hash, error) = match hash_intent(&record) {
        Ok(hash) => (hash, None),
        Err(err) => (String::new(), Some(err.to_string())),
    };
    let valid = error.is_none() && computed_hash == record.hash;

    Ok(VerifyReport {
        id: record.id,
        valid,
        stored_hash: record.hash,
        computed_hash,
        prev_hash: record.prev_hash.unwrap_or_default(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IntentRecord;

    fn stored(store: &LedgerStore) -> IntentRecord {
        let mut r = IntentRecord {
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
        r.hash = hash_intent(&r).unwrap();
        store.create_intent(&r).unwrap();
        r
    }

    #[test]
    fn test_verify_roundtrip() {
        let store = LedgerStore::open_in_memory().unwrap();
        stored(&store);
        let report = verify_intent(&store, "i1").unwrap();
        assert!(report.valid);
        assert_eq!(report.stored_hash, report.computed_hash);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_tamper_detection() {
        let store = LedgerStore::open_in_memory().unwrap();
        stored(&store);
        // Mutate the response text behind the ledger's back.
        store
            .with_conn(|conn| {
                conn.execute("UPDATE intents SET response = 'tampered' WHERE id = 'i1'", [])?;
                Ok(())
            })
            .unwrap();

        let report = verify_intent(&store, "i1").unwrap();
        assert!(!report.valid);
        assert_ne!(report.stored_hash, report.computed_hash);
    }

    #[test]
    fn test_missing_intent_is_not_found() {
        let store = LedgerStore::open_in_memory().unwrap();
        assert!(matches!(
            verify_intent(&store, "ghost"),
            Err(CoreError::IntentNotFound(_))
        ));
    }
}
