use async_trait::async_trait;

pub mod api;
pub mod audio;
pub mod scrape;

use crate::video::VideoId;
use crate::Result;

/// One adapter's result: concatenated transcript text (empty on failure)
/// plus the diagnostic notes produced along the way, in attempt order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOutcome {
    pub text: String,
    pub notes: Vec<String>,
}

impl SourceOutcome {
    pub fn success(text: String, notes: Vec<String>) -> Self {
        Self { text, notes }
    }

    pub fn failure(notes: Vec<String>) -> Self {
        Self {
            text: String::new(),
            notes,
        }
    }

    pub fn succeeded(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Trait for one transcript retrieval strategy.
///
/// Implementations convert every underlying failure into note strings and
/// return an empty outcome; an `Err` from `attempt` is a contract bug that
/// the resolver reports defensively instead of propagating.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Short name used to tag this adapter's diagnostic notes
    fn name(&self) -> &'static str;

    /// Try to retrieve a transcript for the video
    async fn attempt(&self, video: &VideoId) -> Result<SourceOutcome>;
}

/// Join caption segments into one transcript string.
///
/// Embedded newlines become spaces, segments are trimmed, empty segments are
/// dropped, and the remainder is joined with single spaces in the original
/// chronological order.
pub fn join_segments<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .filter_map(|segment| {
            let cleaned = segment
                .as_ref()
                .replace('\n', " ")
                .replace('\r', " ")
                .trim()
                .to_string();
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_drops_empty_and_normalizes() {
        let joined = join_segments(["Hello", "", "world "]);
        assert_eq!(joined, "Hello world");
    }

    #[test]
    fn test_join_replaces_newlines() {
        let joined = join_segments(["first\nline", "second\r\nline"]);
        assert_eq!(joined, "first line second  line");
    }

    #[test]
    fn test_join_empty_input() {
        let joined = join_segments(Vec::<String>::new());
        assert_eq!(joined, "");
    }

    #[test]
    fn test_outcome_succeeded() {
        assert!(SourceOutcome::success("text".into(), vec![]).succeeded());
        assert!(!SourceOutcome::failure(vec!["note".into()]).succeeded());
    }
}
