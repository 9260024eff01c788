use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::resolver::TranscriptResult;

/// JSON report surfaced by the `json` output format
#[derive(Debug, Serialize)]
pub struct TranscriptReport<'a> {
    pub video_id: &'a str,
    pub available: bool,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a str>,
    pub notes: &'a [String],
    pub fetched_at: DateTime<Utc>,
}

pub fn format_as_text(result: &TranscriptResult, summary: Option<&str>, show_notes: bool) -> String {
    let mut out = String::new();

    if result.is_available() {
        out.push_str(&result.text);
        if let Some(summary) = summary {
            out.push_str("\n\n--- Summary ---\n");
            out.push_str(summary);
        }
    } else {
        out.push_str("No transcript available.");
    }

    // Diagnostics always accompany an empty result
    if (show_notes || !result.is_available()) && !result.notes.is_empty() {
        out.push_str("\n\nDiagnostics:\n");
        for note in &result.notes {
            out.push_str("  - ");
            out.push_str(note);
            out.push('\n');
        }
    }

    out
}

pub fn format_as_json(
    video_id: &str,
    result: &TranscriptResult,
    summary: Option<&str>,
) -> Result<String> {
    let report = TranscriptReport {
        video_id,
        available: result.is_available(),
        text: &result.text,
        summary,
        notes: &result.notes,
        fetched_at: Utc::now(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn format_as_notes(result: &TranscriptResult) -> String {
    if result.notes.is_empty() {
        return "(no diagnostic notes)".to_string();
    }

    result
        .notes
        .iter()
        .map(|note| format!("- {}", note))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available_result() -> TranscriptResult {
        TranscriptResult {
            text: "hello world".to_string(),
            notes: vec!["manual [en]: no transcript in requested languages".to_string()],
        }
    }

    fn empty_result() -> TranscriptResult {
        TranscriptResult {
            text: String::new(),
            notes: vec!["page-scrape: captionTracks not found in watch page".to_string()],
        }
    }

    #[test]
    fn test_text_hides_notes_by_default() {
        let out = format_as_text(&available_result(), None, false);
        assert_eq!(out, "hello world");
    }

    #[test]
    fn test_text_shows_notes_on_request() {
        let out = format_as_text(&available_result(), None, true);
        assert!(out.contains("Diagnostics:"));
        assert!(out.contains("manual [en]"));
    }

    #[test]
    fn test_text_always_shows_notes_when_empty() {
        let out = format_as_text(&empty_result(), None, false);
        assert!(out.starts_with("No transcript available."));
        assert!(out.contains("captionTracks not found"));
    }

    #[test]
    fn test_text_appends_summary() {
        let out = format_as_text(&available_result(), Some("short version"), false);
        assert!(out.contains("--- Summary ---"));
        assert!(out.ends_with("short version"));
    }

    #[test]
    fn test_json_report_round_trips() {
        let out = format_as_json("dQw4w9WgXcQ", &available_result(), None).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["video_id"], "dQw4w9WgXcQ");
        assert_eq!(parsed["available"], true);
        assert_eq!(parsed["text"], "hello world");
        assert!(parsed.get("summary").is_none());
        assert_eq!(parsed["notes"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_notes_format() {
        let out = format_as_notes(&empty_result());
        assert_eq!(out, "- page-scrape: captionTracks not found in watch page");

        let none = TranscriptResult { text: String::new(), notes: vec![] };
        assert_eq!(format_as_notes(&none), "(no diagnostic notes)");
    }
}
