//! Chain resolver: reconstruct the ordered sequence of intents reachable
//! by following `prev_hash` backward from a head record.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::IntentRecord;
use crate::store::LedgerStore;

/// The reconstructed chain for a head intent, oldest to newest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainReport {
    pub head_id: String,
    pub length: usize,
    pub intents: Vec<IntentRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_links: Vec<String>,
}

/// Walk `prev_hash` backward from `id`.
///
/// A head that does not exist is an error. A dangling `prev_hash` mid-chain
/// is not: the unresolvable hash is recorded in `missing_links` and the walk
/// stops, so callers can tell a complete chain from one with a gap.
pub fn resolve_chain(store: &LedgerStore, id: &str) -> Result<ChainReport, CoreError> {
    let head = store.get_intent(id)?;
    let head_id = head.id.clone();

    let mut intents = vec![head];
    let mut missing_links = Vec::new();
    loop {
        let prev_hash = match intents
            .last()
            .and_then(|record| record.prev_hash.as_deref())
            .filter(|h| !h.is_empty())
        {
            Some(hash) => hash.to_string(),
            None => break, // reached the chain's origin
        };
        match store.get_intent_by_hash(&prev_hash) {
            Ok(prev) => intents.push(prev),
            Err(CoreError::IntentNotFound(_)) => {
                missing_links.push(prev_hash);
                break;
            }
            Err(err) => return Err(err),
        }
    }

    intents.reverse();
    Ok(ChainReport {
        head_id,
        length: intents.len(),
        intents,
        missing_links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_intent;

    fn linked(id: &str, created_at: &str, prev_hash: Option<&str>) -> IntentRecord {
        let mut r = IntentRecord {
            id: id.into(),
            created_at: created_at.into(),
            author: "ada".into(),
            source_type: "cli".into(),
            title: None,
            prompt: format!("prompt {id}"),
            response: format!("response {id}"),
            meta: None,
            prev_hash: prev_hash.map(String::from),
            hash: String::new(),
        };
        r.hash = hash_intent(&r).unwrap();
        r
    }

    #[test]
    fn test_chain_orders_oldest_to_newest() {
        let store = LedgerStore::open_in_memory().unwrap();
        let a = linked("a", "2026-01-01T00:00:01.000000000Z", None);
        let b = linked("b", "2026-01-01T00:00:02.000000000Z", Some(&a.hash));
        let c = linked("c", "2026-01-01T00:00:03.000000000Z", Some(&b.hash));
        for r in [&a, &b, &c] {
            store.create_intent(r).unwrap();
        }

        let report = resolve_chain(&store, "c").unwrap();
        assert_eq!(report.head_id, "c");
        assert_eq!(report.length, 3);
        let ids: Vec<&str> = report.intents.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(report.missing_links.is_empty());
    }

    #[test]
    fn test_broken_link_is_reported_not_fatal() {
        let store = LedgerStore::open_in_memory().unwrap();
        let a = linked("a", "2026-01-01T00:00:01.000000000Z", None);
        let b = linked("b", "2026-01-01T00:00:02.000000000Z", Some(&a.hash));
        let c = linked("c", "2026-01-01T00:00:03.000000000Z", Some(&b.hash));
        // b is never stored.
        store.create_intent(&a).unwrap();
        store.create_intent(&c).unwrap();

        let report = resolve_chain(&store, "c").unwrap();
        assert_eq!(report.length, 1);
        assert_eq!(report.intents[0].id, "c");
        assert_eq!(report.missing_links, vec![b.hash.clone()]);
    }

    #[test]
    fn test_single_record_chain() {
        let store = LedgerStore::open_in_memory().unwrap();
        let a = linked("a", "2026-01-01T00:00:01.000000000Z", None);
        store.create_intent(&a).unwrap();

        let report = resolve_chain(&store, "a").unwrap();
        assert_eq!(report.length, 1);
        assert!(report.missing_links.is_empty());
    }

    #[test]
    fn test_missing_head_is_not_found() {
        let store = LedgerStore::open_in_memory().unwrap();
        assert!(matches!(
            resolve_chain(&store, "ghost"),
            Err(CoreError::IntentNotFound(_))
        ));
    }
}
