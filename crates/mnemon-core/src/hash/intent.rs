use crate::error::CoreError;
use crate::model::IntentRecord;

use super::normalize::{canonical_timestamp, normalize_newlines};
use super::preimage::Preimage;

/// Compute the deterministic SHA-256 hash of an intent record.
///
/// Preimage key order: `author`, `created_at`, `source_type`, `title`
/// (when non-empty), `prompt`, `response`, `meta` (when present, keys
/// sorted), `prev_hash` (when non-empty). `id` and `hash` never
/// participate.
///
/// Identity fields (author, source_type, title) are trimmed; prompt and
/// response keep their content byte-for-byte apart from line-ending
/// normalization.
pub fn hash_intent(record: &IntentRecord) -> Result<String, CoreError> {
    let author = normalize_newlines(record.author.trim());
    if author.is_empty() {
        return Err(CoreError::Validation(
            "author is required for hashing".into(),
        ));
    }
    let source_type = normalize_newlines(record.source_type.trim());
    if source_type.is_empty() {
        return Err(CoreError::Validation(
            "source_type is required for hashing".into(),
        ));
    }
    if record.created_at.is_empty() {
        return Err(CoreError::Validation(
            "created_at is required for hashing".into(),
        ));
    }
    let created_at = canonical_timestamp(&record.created_at)
        .map_err(|_| CoreError::Validation("created_at must be RFC3339".into()))?;

    let mut preimage = Preimage::new();
    preimage.string_field("author", &author);
    preimage.string_field("created_at", &created_at);
    preimage.string_field("source_type", &source_type);
    let title = record
        .title
        .as_deref()
        .map(|t| normalize_newlines(t.trim()))
        .unwrap_or_default();
    if !title.is_empty() {
        preimage.string_field("title", &title);
    }
    preimage.string_field("prompt", &normalize_newlines(&record.prompt));
    preimage.string_field("response", &normalize_newlines(&record.response));
    if let Some(meta) = &record.meta {
        // BTreeMap serializes with sorted keys, so the rendering is stable.
        preimage.raw_field("meta", &serde_json::to_string(meta)?);
    }
    let prev_hash = record.prev_hash.as_deref().unwrap_or("").trim();
    if !prev_hash.is_empty() {
        preimage.string_field("prev_hash", prev_hash);
    }

    Ok(preimage.digest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Meta;

    fn sample() -> IntentRecord {
        let mut meta = Meta::new();
        meta.insert("project".into(), "alpha".into());
        meta.insert("lang".into(), "rust".into());
        IntentRecord {
            id: "b31c7a1de9954c97a61b2f4d8f0c5e21".into(),
            created_at: "2026-02-10T08:30:00Z".into(),
            author: "Ada".into(),
            source_type: "cli".into(),
            title: Some("auth work".into()),
            prompt: "Add OAuth2 support".into(),
            response: "Done, see src/auth.rs".into(),
            meta: Some(meta),
            prev_hash: None,
            hash: String::new(),
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        let record = sample();
        assert_eq!(hash_intent(&record).unwrap(), hash_intent(&record).unwrap());
        assert_eq!(hash_intent(&record).unwrap().len(), 64);
    }

    #[test]
    fn test_id_and_hash_do_not_participate() {
        let a = sample();
        let mut b = sample();
        b.id = "something-else".into();
        b.hash = "ffff".into();
        assert_eq!(hash_intent(&a).unwrap(), hash_intent(&b).unwrap());
    }

    #[test]
    fn test_line_endings_collapse() {
        let mut unix = sample();
        unix.prompt = "line one\nline two".into();
        let mut windows = sample();
        windows.prompt = "line one\r\nline two".into();
        assert_eq!(hash_intent(&unix).unwrap(), hash_intent(&windows).unwrap());
    }

    #[test]
    fn test_timestamp_precision_collapses() {
        let a = sample();
        let mut b = sample();
        b.created_at = "2026-02-10T08:30:00.000000Z".into();
        assert_eq!(hash_intent(&a).unwrap(), hash_intent(&b).unwrap());
    }

    #[test]
    fn test_each_field_changes_hash() {
        let base = hash_intent(&sample()).unwrap();

        let mut r = sample();
        r.author = "Adb".into();
        assert_ne!(base, hash_intent(&r).unwrap());

        let mut r = sample();
        r.source_type = "sdk".into();
        assert_ne!(base, hash_intent(&r).unwrap());

        let mut r = sample();
        r.title = Some("auth worK".into());
        assert_ne!(base, hash_intent(&r).unwrap());

        let mut r = sample();
        r.prompt.push('!');
        assert_ne!(base, hash_intent(&r).unwrap());

        let mut r = sample();
        r.response.push('!');
        assert_ne!(base, hash_intent(&r).unwrap());

        let mut r = sample();
        r.meta.as_mut().unwrap().insert("extra".into(), "1".into());
        assert_ne!(base, hash_intent(&r).unwrap());

        let mut r = sample();
        r.prev_hash = Some("deadbeef".into());
        assert_ne!(base, hash_intent(&r).unwrap());
    }

    #[test]
    fn test_absent_title_matches_empty_title() {
        let mut with_none = sample();
        with_none.title = None;
        let mut with_blank = sample();
        with_blank.title = Some("   ".into());
        assert_eq!(
            hash_intent(&with_none).unwrap(),
            hash_intent(&with_blank).unwrap()
        );
    }

    #[test]
    fn test_required_fields_validated() {
        let mut r = sample();
        r.author = "  ".into();
        assert!(matches!(hash_intent(&r), Err(CoreError::Validation(_))));

        let mut r = sample();
        r.created_at = "not rfc3339".into();
        assert!(hash_intent(&r).is_err());
    }
}
