use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::sources::api::ApiSource;
use crate::sources::audio::{AudioSource, SpeechTranscriber};
use crate::sources::scrape::ScrapeSource;
use crate::sources::CaptionSource;
use crate::utils::truncate_message;
use crate::video::VideoId;
use crate::Result;

/// The resolver's output: concatenated transcript text (empty when every
/// source failed) plus the ordered diagnostic notes of all attempted
/// sources. Sources that were never reached contribute no notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub text: String,
    pub notes: Vec<String>,
}

impl TranscriptResult {
    pub fn is_available(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Orchestrates caption sources in a fixed priority order and returns the
/// first success.
///
/// `resolve` is total: it never fails and never panics for a valid video
/// ID. Exhaustion of all sources is a normal outcome represented by empty
/// text, not an error.
pub struct TranscriptResolver {
    sources: Vec<Box<dyn CaptionSource>>,
}

impl TranscriptResolver {
    /// Build the default source chain from configuration: structured API
    /// first, then page scraping, then audio transcription when enabled.
    pub fn new(config: &Config) -> Result<Self> {
        let mut sources: Vec<Box<dyn CaptionSource>> = vec![
            Box::new(ApiSource::new(&config.fetch)?),
            Box::new(ScrapeSource::new(&config.fetch)?),
        ];

        if config.audio.enabled {
            let transcriber = Arc::new(SpeechTranscriber::new(&config.audio));
            sources.push(Box::new(AudioSource::new(
                &config.audio,
                &config.fetch,
                transcriber,
            )));
        }

        Ok(Self { sources })
    }

    /// Build a resolver over an explicit source chain
    pub fn with_sources(sources: Vec<Box<dyn CaptionSource>>) -> Self {
        Self { sources }
    }

    /// Names of the configured sources, in priority order
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve a transcript by trying each source in order.
    pub async fn resolve(&self, video: &VideoId) -> TranscriptResult {
        let mut notes = Vec::new();

        for source in &self.sources {
            tracing::info!("Trying source: {}", source.name());

            match source.attempt(video).await {
                Ok(outcome) => {
                    let succeeded = outcome.succeeded();
                    notes.extend(outcome.notes);
                    if succeeded {
                        tracing::info!("Source {} produced a transcript", source.name());
                        return TranscriptResult {
                            text: outcome.text,
                            notes,
                        };
                    }
                    tracing::debug!("Source {} yielded nothing", source.name());
                }
                Err(err) => {
                    // A source broke its never-raise contract; report and move on
                    tracing::warn!("Source {} returned an error: {}", source.name(), err);
                    notes.push(format!(
                        "{}: unexpected error: {}",
                        source.name(),
                        truncate_message(&err.to_string())
                    ));
                }
            }
        }

        TranscriptResult {
            text: String::new(),
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{MockCaptionSource, SourceOutcome};

    fn failing_source(name: &'static str, notes: Vec<&str>) -> MockCaptionSource {
        let notes: Vec<String> = notes.into_iter().map(String::from).collect();
        let mut mock = MockCaptionSource::new();
        mock.expect_name().return_const(name);
        mock.expect_attempt()
            .returning(move |_| Ok(SourceOutcome::failure(notes.clone())));
        mock
    }

    fn succeeding_source(name: &'static str, text: &str, notes: Vec<&str>) -> MockCaptionSource {
        let text = text.to_string();
        let notes: Vec<String> = notes.into_iter().map(String::from).collect();
        let mut mock = MockCaptionSource::new();
        mock.expect_name().return_const(name);
        mock.expect_attempt()
            .returning(move |_| Ok(SourceOutcome::success(text.clone(), notes.clone())));
        mock
    }

    fn video() -> VideoId {
        crate::video::extract("dQw4w9WgXcQ").unwrap()
    }

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        // Succeeds on its second language attempt: one failure note, then text
        let api = succeeding_source("captions-api", "hello there", vec!["manual [en]: no transcript in requested languages"]);

        let mut scrape = MockCaptionSource::new();
        scrape.expect_name().return_const("page-scrape");
        scrape.expect_attempt().times(0);

        let resolver = TranscriptResolver::with_sources(vec![Box::new(api), Box::new(scrape)]);
        let result = resolver.resolve(&video()).await;

        assert_eq!(result.text, "hello there");
        assert_eq!(result.notes.len(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_collects_every_note() {
        let api = failing_source(
            "captions-api",
            vec![
                "manual [en, de]: no transcript in requested languages",
                "manual [de]: no transcript in requested languages",
                "auto [en, de]: no transcript in requested languages",
                "auto [de]: no transcript in requested languages",
            ],
        );
        let scrape = failing_source("page-scrape", vec!["page-scrape: captionTracks not found in watch page"]);

        let resolver = TranscriptResolver::with_sources(vec![Box::new(api), Box::new(scrape)]);
        let result = resolver.resolve(&video()).await;

        assert!(!result.is_available());
        assert_eq!(result.notes.len(), 5);
    }

    #[tokio::test]
    async fn test_later_source_rescues() {
        let api = failing_source("captions-api", vec!["captions-api: captions disabled by the content owner"]);
        let scrape = succeeding_source("page-scrape", "scraped text", vec![]);

        let resolver = TranscriptResolver::with_sources(vec![Box::new(api), Box::new(scrape)]);
        let result = resolver.resolve(&video()).await;

        assert_eq!(result.text, "scraped text");
        assert_eq!(result.notes.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let make_resolver = || {
            let api = failing_source("captions-api", vec!["captions-api: transport error: HTTP 500"]);
            let scrape = succeeding_source("page-scrape", "stable text", vec![]);
            TranscriptResolver::with_sources(vec![Box::new(api), Box::new(scrape)])
        };

        let first = make_resolver().resolve(&video()).await;
        let second = make_resolver().resolve(&video()).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_contract_breach_becomes_note() {
        let mut broken = MockCaptionSource::new();
        broken.expect_name().return_const("captions-api");
        broken
            .expect_attempt()
            .returning(|_| Err(anyhow::anyhow!("adapter bug")));

        let scrape = succeeding_source("page-scrape", "still works", vec![]);

        let resolver = TranscriptResolver::with_sources(vec![Box::new(broken), Box::new(scrape)]);
        let result = resolver.resolve(&video()).await;

        assert_eq!(result.text, "still works");
        assert_eq!(result.notes.len(), 1);
        assert!(result.notes[0].contains("unexpected error"));
    }

    #[tokio::test]
    async fn test_empty_chain_yields_empty_result() {
        let resolver = TranscriptResolver::with_sources(vec![]);
        let result = resolver.resolve(&video()).await;
        assert!(!result.is_available());
        assert!(result.notes.is_empty());
    }
}
