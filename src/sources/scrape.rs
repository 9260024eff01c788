use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{join_segments, CaptionSource, SourceOutcome};
use crate::captions::parse_timedtext_segments;
use crate::config::FetchConfig;
use crate::utils::truncate_message;
use crate::video::VideoId;
use crate::Result;

// Servers may reject unrecognized or missing user agents
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const TRACKS_KEY: &str = "\"captionTracks\":";

/// Watch-page scrape adapter.
///
/// Fallback for when the structured API yields nothing: pulls the public
/// watch page, isolates the embedded caption-track descriptors, and fetches
/// the best-matching track directly. The served caption format is not
/// guaranteed stable, so both the json3 and the legacy XML body shapes are
/// supported.
pub struct ScrapeSource {
    client: reqwest::Client,
    languages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapedTrack {
    base_url: String,
    language_code: String,
}

#[derive(Debug, Deserialize)]
struct CaptionBody {
    #[serde(default)]
    events: Vec<CaptionEvent>,
}

#[derive(Debug, Deserialize)]
struct CaptionEvent {
    #[serde(default)]
    segs: Vec<CaptionSeg>,
}

#[derive(Debug, Deserialize)]
struct CaptionSeg {
    // Some served variants carry the payload under "text" instead
    #[serde(default, alias = "text")]
    utf8: String,
}

impl ScrapeSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(config.page_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            languages: config.languages.clone(),
        })
    }

    /// Pick the track matching the preference list, falling back to the
    /// first listed track with a note when no language matches.
    fn select_track<'a>(&self, tracks: &'a [ScrapedTrack]) -> (&'a ScrapedTrack, Option<String>) {
        for lang in &self.languages {
            if let Some(track) = tracks
                .iter()
                .find(|t| t.language_code.eq_ignore_ascii_case(lang))
            {
                return (track, None);
            }
        }

        let first = &tracks[0];
        let note = format!(
            "{}: no track for [{}]; falling back to first track ({})",
            self.name(),
            self.languages.join(", "),
            first.language_code
        );
        (first, Some(note))
    }

    async fn fetch_text(&self, url: &str) -> std::result::Result<String, String> {
        let response = self.client.get(url).send().await.map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        response.text().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl CaptionSource for ScrapeSource {
    fn name(&self) -> &'static str {
        "page-scrape"
    }

    async fn attempt(&self, video: &VideoId) -> Result<SourceOutcome> {
        let mut notes = Vec::new();

        let html = match self.fetch_text(&video.watch_url()).await {
            Ok(html) => html,
            Err(err) => {
                notes.push(format!(
                    "{}: watch page fetch failed: {}",
                    self.name(),
                    truncate_message(&err)
                ));
                return Ok(SourceOutcome::failure(notes));
            }
        };

        // Key absent or malformed JSON is terminal for this adapter
        let Some(array) = isolate_tracks_array(&html) else {
            notes.push(format!(
                "{}: captionTracks not found in watch page",
                self.name()
            ));
            return Ok(SourceOutcome::failure(notes));
        };

        let tracks: Vec<ScrapedTrack> = match serde_json::from_str(array) {
            Ok(tracks) => tracks,
            Err(err) => {
                notes.push(format!(
                    "{}: malformed captionTracks JSON: {}",
                    self.name(),
                    truncate_message(&err.to_string())
                ));
                return Ok(SourceOutcome::failure(notes));
            }
        };

        if tracks.is_empty() {
            notes.push(format!("{}: empty captionTracks list", self.name()));
            return Ok(SourceOutcome::failure(notes));
        }

        let (track, fallback_note) = self.select_track(&tracks);
        notes.extend(fallback_note);

        let locator = with_json3_format(&track.base_url);
        tracing::debug!("Fetching caption body for track {}", track.language_code);

        let body = match self.fetch_text(&locator).await {
            Ok(body) => body,
            Err(err) => {
                notes.push(format!(
                    "{}: caption fetch failed ({}): {}",
                    self.name(),
                    track.language_code,
                    truncate_message(&err)
                ));
                return Ok(SourceOutcome::failure(notes));
            }
        };

        let text = parse_caption_body(&body);
        match text {
            Some(text) if !text.is_empty() => Ok(SourceOutcome::success(text, notes)),
            Some(_) => {
                notes.push(format!(
                    "{}: caption body for {} contained no text",
                    self.name(),
                    track.language_code
                ));
                Ok(SourceOutcome::failure(notes))
            }
            None => {
                notes.push(format!(
                    "{}: unrecognized caption body format for {}",
                    self.name(),
                    track.language_code
                ));
                Ok(SourceOutcome::failure(notes))
            }
        }
    }
}

/// Isolate the JSON array following the `captionTracks` key by balanced
/// bracket scanning. String-aware: brackets inside quoted values (track
/// names, URLs) do not affect the depth count.
fn isolate_tracks_array(html: &str) -> Option<&str> {
    let key_pos = html.find(TRACKS_KEY)?;
    let after_key = &html[key_pos + TRACKS_KEY.len()..];
    let start = after_key.find('[')?;
    let array = &after_key[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in array.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '[' if !in_string => depth += 1,
            ']' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&array[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Append the structured-JSON format parameter when the locator lacks one
fn with_json3_format(base_url: &str) -> String {
    if let Ok(parsed) = Url::parse(base_url) {
        if parsed.query_pairs().any(|(k, _)| k == "fmt") {
            return base_url.to_string();
        }
    }

    if base_url.contains('?') {
        format!("{}&fmt=json3", base_url)
    } else {
        format!("{}?fmt=json3", base_url)
    }
}

/// Parse a caption body in either served shape.
///
/// Returns `None` when the body is neither valid json3 nor timedtext XML;
/// `Some("")` when it parsed but carried no text.
fn parse_caption_body(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<CaptionBody>(body) {
        let segments = parsed
            .events
            .into_iter()
            .flat_map(|event| event.segs)
            .map(|seg| seg.utf8);
        return Some(join_segments(segments));
    }

    // Legacy XML shape
    let segments = parse_timedtext_segments(body);
    if segments.is_empty() && !body.contains("<text") {
        return None;
    }
    Some(join_segments(segments))
}
