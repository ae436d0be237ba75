use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::CoreError;

/// Convert CRLF/CR line endings to LF for stable storage and hashing.
pub fn normalize_newlines(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    value.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parse an RFC3339 timestamp of any sub-second precision and re-emit it
/// as UTC RFC3339 with exactly nine fractional digits and a `Z` suffix.
///
/// The fixed width keeps lexicographic comparison of stored timestamps
/// consistent with chronological order.
pub fn canonical_timestamp(value: &str) -> Result<String, CoreError> {
    let parsed = DateTime::parse_from_rfc3339(value)?;
    Ok(parsed
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Nanos, true))
}

/// The current instant in canonical ledger form.
pub fn now_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}
