use async_trait::async_trait;
use std::time::Duration;

use super::{join_segments, CaptionSource, SourceOutcome};
use crate::captions::{CaptionClient, CaptionsError, TrackKind, TranscriptList};
use crate::config::FetchConfig;
use crate::utils::truncate_message;
use crate::video::VideoId;
use crate::Result;

/// Structured captions API adapter.
///
/// Tries manually created tracks before auto-generated ones, walking the
/// language preference progression within each kind: the full list first,
/// then each non-primary language on its own.
pub struct ApiSource {
    client: CaptionClient,
    languages: Vec<String>,
}

impl ApiSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            client: CaptionClient::new(Duration::from_secs(config.api_timeout_secs))?,
            languages: config.languages.clone(),
        })
    }

    fn language_sets(&self) -> Vec<Vec<String>> {
        let mut sets = vec![self.languages.clone()];
        for lang in self.languages.iter().skip(1) {
            sets.push(vec![lang.clone()]);
        }
        sets
    }

    async fn try_kind(
        &self,
        list: &TranscriptList,
        kind: TrackKind,
        notes: &mut Vec<String>,
    ) -> Option<String> {
        for set in self.language_sets() {
            let label = set.join(", ");
            let found = match kind {
                TrackKind::Manual => list.find_manual(&set),
                TrackKind::Generated => list.find_generated(&set),
            };

            let track = match found {
                Ok(track) => track,
                Err(_) => {
                    notes.push(format!("{} [{}]: no transcript in requested languages", kind, label));
                    continue;
                }
            };

            tracing::debug!(
                "Fetching {} track ({}) for languages [{}]",
                track.kind,
                track.language_code,
                label
            );
            match self.client.fetch_track(track).await {
                Ok(segments) => {
                    let text = join_segments(segments);
                    if !text.is_empty() {
                        return Some(text);
                    }
                    notes.push(format!("{} [{}]: empty transcript body", kind, label));
                }
                Err(err) => {
                    notes.push(format!(
                        "{} [{}]: {}",
                        kind,
                        label,
                        truncate_message(&err.to_string())
                    ));
                }
            }
        }
        None
    }
}

#[async_trait]
impl CaptionSource for ApiSource {
    fn name(&self) -> &'static str {
        "captions-api"
    }

    async fn attempt(&self, video: &VideoId) -> Result<SourceOutcome> {
        let mut notes = Vec::new();

        let list = match self.client.list_transcripts(video).await {
            Ok(list) => list,
            Err(CaptionsError::Disabled) => {
                // No point walking language sets when the owner disabled captions
                notes.push(format!("{}: captions disabled by the content owner", self.name()));
                return Ok(SourceOutcome::failure(notes));
            }
            Err(err) => {
                notes.push(format!(
                    "{}: {}",
                    self.name(),
                    truncate_message(&err.to_string())
                ));
                return Ok(SourceOutcome::failure(notes));
            }
        };

        for kind in [TrackKind::Manual, TrackKind::Generated] {
            if let Some(text) = self.try_kind(&list, kind, &mut notes).await {
                return Ok(SourceOutcome::success(text, notes));
            }
        }

        Ok(SourceOutcome::failure(notes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn source_with_languages(languages: &[&str]) -> ApiSource {
        let mut config = Config::default();
        config.fetch.languages = languages.iter().map(|s| s.to_string()).collect();
        ApiSource::new(&config.fetch).unwrap()
    }

    #[test]
    fn test_language_progression() {
        let source = source_with_languages(&["en", "en-US", "en-GB"]);
        let sets = source.language_sets();
        assert_eq!(
            sets,
            vec![
                vec!["en".to_string(), "en-US".to_string(), "en-GB".to_string()],
                vec!["en-US".to_string()],
                vec!["en-GB".to_string()],
            ]
        );
    }

    #[test]
    fn test_single_language_has_one_set() {
        let source = source_with_languages(&["en"]);
        assert_eq!(source.language_sets(), vec![vec!["en".to_string()]]);
    }
}
