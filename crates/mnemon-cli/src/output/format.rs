use std::fmt::Write as _;

use mnemon_core::chain::ChainReport;
use mnemon_core::model::IntentRecord;
use mnemon_core::timeline::{Timeline, TimelineEvent};
use mnemon_core::verify::VerifyReport;

use super::OutputFormat;

pub fn format_intent_list(intents: &[IntentRecord], fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(intents).unwrap_or_default(),
        OutputFormat::Text => {
            let mut out = String::from("ID\tCreated_At\tAuthor\tSource\tTitle\n");
            for intent in intents {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    intent.id,
                    intent.created_at,
                    intent.author,
                    intent.source_type,
                    intent.title.as_deref().unwrap_or("")
                );
            }
            out
        }
    }
}

pub fn format_intent_full(intent: &IntentRecord, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(intent).unwrap_or_default(),
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "ID: {}", intent.id);
            let _ = writeln!(out, "Created_At: {}", intent.created_at);
            let _ = writeln!(out, "Author: {}", intent.author);
            let _ = writeln!(out, "Source: {}", intent.source_type);
            let _ = writeln!(out, "Title: {}", intent.title.as_deref().unwrap_or(""));
            let _ = writeln!(
                out,
                "Prev_Hash: {}",
                intent.prev_hash.as_deref().unwrap_or("")
            );
            let _ = writeln!(out, "Hash: {}", intent.hash);
            match &intent.meta {
                Some(meta) if !meta.is_empty() => {
                    let text = serde_json::to_string(meta).unwrap_or_default();
                    let _ = writeln!(out, "Meta: {text}");
                }
                _ => out.push_str("Meta: \n"),
            }
            out.push_str("--- Prompt ---\n");
            let _ = writeln!(out, "{}", intent.prompt);
            out.push_str("--- Response ---\n");
            let _ = writeln!(out, "{}", intent.response);
            out
        }
    }
}

pub fn format_verify(report: &VerifyReport, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(if report.valid {
                "\u{2714} VALID\n"
            } else {
                "\u{2716} INVALID\n"
            });
            let _ = writeln!(out, "stored_hash: {}", report.stored_hash);
            let _ = writeln!(out, "computed_hash: {}", report.computed_hash);
            if let Some(error) = &report.error {
                let _ = writeln!(out, "error: {error}");
            }
            out
        }
    }
}

pub fn format_chain(report: &ChainReport, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "chain head: {}", report.head_id);
            for (i, intent) in report.intents.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    i + 1,
                    intent.created_at,
                    intent.title.as_deref().unwrap_or(""),
                    intent.author,
                    intent.hash
                );
            }
            if !report.missing_links.is_empty() {
                let _ = writeln!(out, "missing_links: {}", report.missing_links.join(","));
            }
            out
        }
    }
}

/// Render a project timeline as the exported markdown log.
pub fn render_markdown_log(timeline: &Timeline, cli_version: &str, exported_at: &str) -> String {
    let mut out = String::new();
    out.push_str("# Mnemon Agent Log\n\n");
    let _ = writeln!(out, "Project: {}", timeline.project);
    let _ = writeln!(out, "Exported: {exported_at}");
    let _ = writeln!(out, "Version: {cli_version}\n");
    out.push_str("---\n\n");

    if timeline.entries.is_empty() && timeline.capture_count == 0 {
        out.push_str("No captures recorded.\n");
        return out;
    }

    for entry in &timeline.entries {
        match &entry.event {
            TimelineEvent::Checkpoint { id, summary } => {
                let _ = writeln!(out, "## Checkpoint: {id}\n");
                let _ = writeln!(out, "Summary: {summary}");
                let _ = writeln!(out, "Timestamp: {}", entry.timestamp);
                out.push_str("----------------------\n\n");
            }
            TimelineEvent::Event { command, value } => {
                let _ = writeln!(out, "### Event: {command}\n");
                if !value.trim().is_empty() {
                    let _ = writeln!(out, "Value: {value}");
                }
                let _ = writeln!(out, "Timestamp: {}", entry.timestamp);
                out.push_str("----------------------\n\n");
            }
            TimelineEvent::Capture {
                id,
                author,
                hash,
                prompt,
                response,
                meta,
            } => {
                let _ = writeln!(out, "### Capture: {id}\n");
                let _ = writeln!(out, "Role: {author}");
                let _ = writeln!(out, "Timestamp: {}", entry.timestamp);
                let _ = writeln!(out, "Hash: {hash}\n");
                if let Some(meta) = meta.as_ref().filter(|m| !m.is_empty()) {
                    out.push_str("Metadata:\n");
                    for (key, value) in meta {
                        let _ = writeln!(out, "  {key}: {value}");
                    }
                    out.push('\n');
                }
                out.push_str("**Prompt**\n```text\n");
                out.push_str(prompt);
                out.push_str("\n```\n\n");
                out.push_str("**Response**\n```text\n");
                out.push_str(response);
                out.push_str("\n```\n\n");
                out.push_str("---\n\n");
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemon_core::timeline::TimelineEntry;

    #[test]
    fn test_empty_timeline_renders_placeholder() {
        let timeline = Timeline {
            project: "alpha".into(),
            entries: Vec::new(),
            capture_count: 0,
        };
        let log = render_markdown_log(&timeline, "0.1.0", "2026-01-01T00:00:00Z");
        assert!(log.contains("# Mnemon Agent Log"));
        assert!(log.contains("Project: alpha"));
        assert!(log.contains("No captures recorded."));
    }

    #[test]
    fn test_capture_section_layout() {
        let timeline = Timeline {
            project: "alpha".into(),
            entries: vec![TimelineEntry {
                timestamp: "2026-01-01T00:00:00.000000000Z".into(),
                seq: 1,
                event: TimelineEvent::Capture {
                    id: "i1".into(),
                    author: "ada".into(),
                    hash: "h1".into(),
                    prompt: "ask".into(),
                    response: "answer".into(),
                    meta: None,
                },
            }],
            capture_count: 1,
        };
        let log = render_markdown_log(&timeline, "0.1.0", "2026-01-01T00:00:00Z");
        assert!(log.contains("### Capture: i1"));
        assert!(log.contains("Role: ada"));
        assert!(log.contains("**Prompt**\n```text\nask\n```"));
    }

    #[test]
    fn test_verify_text_states_validity() {
        let report = VerifyReport {
            id: "i1".into(),
            valid: true,
            stored_hash: "h".into(),
            computed_hash: "h".into(),
            prev_hash: String::new(),
            error: None,
        };
        let text = format_verify(&report, OutputFormat::Text);
        assert!(text.contains("VALID"));
        assert!(text.contains("stored_hash: h"));
    }
}
