//! Chronological merging of independently time-ordered streams into one
//! total order, used by history export and rendering.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::Meta;
use crate::store::LedgerStore;

/// One entry of a project's merged history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub timestamp: String,
    /// Row-insertion sequence in the originating table; the tie-break for
    /// entries sharing a timestamp.
    pub seq: i64,
    #[serde(flatten)]
    pub event: TimelineEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineEvent {
    Checkpoint {
        id: String,
        summary: String,
    },
    Capture {
        id: String,
        author: String,
        hash: String,
        prompt: String,
        response: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<Meta>,
    },
    Event {
        command: String,
        value: String,
    },
}

/// A project's full history: checkpoints and intents merged into one
/// total order, plus the number of real (non-event) captures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub project: String,
    pub entries: Vec<TimelineEntry>,
    pub capture_count: usize,
}

/// Load and merge a project's intents and checkpoints chronologically.
pub fn project_timeline(store: &LedgerStore, project: &str) -> Result<Timeline, CoreError> {
    let mut capture_count = 0;

    let intents: Vec<TimelineEntry> = store
        .intent_rows_ascending()?
        .into_iter()
        .filter(|(_, record)| record.project() == Some(project))
        .map(|(seq, record)| {
            let event = if record.is_event() {
                TimelineEvent::Event {
                    command: record.prompt.trim().to_string(),
                    value: record.response.trim().to_string(),
                }
            } else {
                capture_count += 1;
                TimelineEvent::Capture {
                    id: record.id,
                    author: record.author,
                    hash: record.hash,
                    prompt: record.prompt,
                    response: record.response,
                    meta: record.meta,
                }
            };
            TimelineEntry {
                timestamp: record.created_at,
                seq,
                event,
            }
        })
        .collect();

    let checkpoints: Vec<TimelineEntry> = store
        .checkpoint_rows_ascending(project)?
        .into_iter()
        .map(|(seq, checkpoint)| TimelineEntry {
            timestamp: checkpoint.created_at,
            seq,
            event: TimelineEvent::Checkpoint {
                id: checkpoint.hash,
                summary: checkpoint.summary,
            },
        })
        .collect();

    Ok(Timeline {
        project: project.to_string(),
        entries: merge_chronological(intents, checkpoints),
        capture_count,
    })
}

/// Two-pointer merge of two streams already ordered by
/// `(timestamp, seq)`. Timestamps compare as strings (canonical RFC3339
/// text orders chronologically); equal timestamps resolve by the lower
/// insertion sequence, the left stream winning exact ties.
pub fn merge_chronological(
    left: Vec<TimelineEntry>,
    right: Vec<TimelineEntry>,
) -> Vec<TimelineEntry> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let take_left = match l.timestamp.cmp(&r.timestamp) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => l.seq <= r.seq,
        };
        if take_left {
            merged.extend(left.next());
        } else {
            merged.extend(right.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_intent;
    use crate::model::IntentRecord;

    fn entry(timestamp: &str, seq: i64, summary: &str) -> TimelineEntry {
        TimelineEntry {
            timestamp: timestamp.into(),
            seq,
            event: TimelineEvent::Checkpoint {
                id: format!("cp-{seq}"),
                summary: summary.into(),
            },
        }
    }

    fn summaries(entries: &[TimelineEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| match &e.event {
                TimelineEvent::Checkpoint { summary, .. } => summary.clone(),
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_merge_interleaves_by_timestamp() {
        let left = vec![
            entry("2026-01-01T00:00:01.000000000Z", 1, "a"),
            entry("2026-01-01T00:00:03.000000000Z", 2, "c"),
        ];
        let right = vec![
            entry("2026-01-01T00:00:02.000000000Z", 1, "b"),
            entry("2026-01-01T00:00:04.000000000Z", 2, "d"),
        ];
        let merged = merge_chronological(left, right);
        assert_eq!(summaries(&merged), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_merge_breaks_timestamp_ties_by_sequence() {
        let ts = "2026-01-01T00:00:01.000000000Z";
        let left = vec![entry(ts, 5, "later-insert")];
        let right = vec![entry(ts, 2, "earlier-insert")];
        let merged = merge_chronological(left, right);
        assert_eq!(summaries(&merged), vec!["earlier-insert", "later-insert"]);
    }

    #[test]
    fn test_merge_with_one_empty_stream() {
        let left = vec![entry("2026-01-01T00:00:01.000000000Z", 1, "only")];
        assert_eq!(summaries(&merge_chronological(left.clone(), Vec::new())), vec!["only"]);
        assert_eq!(summaries(&merge_chronological(Vec::new(), left)), vec!["only"]);
    }

    fn capture(store: &LedgerStore, id: &str, created_at: &str, source_type: &str) {
        let mut meta = Meta::new();
        meta.insert("project".into(), "alpha".into());
        let mut r = IntentRecord {
            id: id.into(),
            created_at: created_at.into(),
            author: "ada".into(),
            source_type: source_type.into(),
            title: None,
            prompt: format!("prompt {id}"),
            response: format!("response {id}"),
            meta: Some(meta),
            prev_hash: None,
            hash: String::new(),
        };
        r.hash = hash_intent(&r).unwrap();
        store.create_intent(&r).unwrap();
    }

    #[test]
    fn test_project_timeline_classifies_and_counts() {
        let store = LedgerStore::open_in_memory().unwrap();
        store.create_project("alpha", "").unwrap();
        capture(&store, "c1", "2020-01-01T00:00:01.000000000Z", "cli");
        capture(&store, "e1", "2020-01-01T00:00:02.000000000Z", "meta-command");
        store.create_checkpoint("alpha", "snap", Vec::new()).unwrap();

        let timeline = project_timeline(&store, "alpha").unwrap();
        assert_eq!(timeline.entries.len(), 3);
        assert_eq!(timeline.capture_count, 1);
        assert!(matches!(
            timeline.entries[0].event,
            TimelineEvent::Capture { .. }
        ));
        assert!(matches!(
            timeline.entries[1].event,
            TimelineEvent::Event { .. }
        ));
        assert!(matches!(
            timeline.entries[2].event,
            TimelineEvent::Checkpoint { .. }
        ));
    }

    #[test]
    fn test_project_timeline_tie_break_follows_insertion_order() {
        let store = LedgerStore::open_in_memory().unwrap();
        store.create_project("alpha", "").unwrap();
        // Give the checkpoint and a later intent the same timestamp by
        // rewriting the intent's created_at to match.
        let checkpoint = store.create_checkpoint("alpha", "snap", Vec::new()).unwrap();
        capture(&store, "c1", "2020-01-01T00:00:01.000000000Z", "cli");
        store
            .with_conn(|conn| {
                conn.execute(
                    "UPDATE intents SET created_at = ?1 WHERE id = 'c1'",
                    [&checkpoint.created_at],
                )?;
                Ok(())
            })
            .unwrap();

        let timeline = project_timeline(&store, "alpha").unwrap();
        // Equal timestamps: checkpoint rowid 1 vs intent rowid 1; the
        // intent stream is the left argument and wins exact ties.
        assert_eq!(timeline.entries.len(), 2);
        assert!(matches!(
            timeline.entries[0].event,
            TimelineEvent::Capture { .. }
        ));
    }
}
