//! Structured captions capability.
//!
//! Talks to the player metadata API to list the caption tracks a video
//! exposes, split into manually created and auto-generated tracks, and
//! fetches individual track bodies (timedtext XML). Every failure mode is a
//! variant of the closed [`CaptionsError`] enumeration so callers can react
//! to "disabled" and "not found" without string matching.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::time::Duration;

use crate::video::VideoId;

const PLAYER_API_URL: &str = "https://www.youtube.com/youtubei/v1/player?key=";

lazy_static! {
    static ref API_KEY_RE: Regex =
        Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap();
}

/// Typed failure conditions of the captions capability.
#[derive(thiserror::Error, Debug)]
pub enum CaptionsError {
    #[error("captions disabled by the content owner")]
    Disabled,

    #[error("no transcript in requested languages [{}]", .languages.join(", "))]
    NoTranscript { languages: Vec<String> },

    #[error("transport error: {0}")]
    Http(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Whether a track was authored by the owner or machine-generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Manual,
    Generated,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Manual => write!(f, "manual"),
            TrackKind::Generated => write!(f, "auto"),
        }
    }
}

/// One available caption stream for a video.
#[derive(Debug, Clone)]
pub struct CaptionTrack {
    pub language_code: String,
    pub kind: TrackKind,
    pub base_url: String,
}

/// Caption tracks available for one video, in the order the API listed them.
#[derive(Debug, Clone, Default)]
pub struct TranscriptList {
    pub manual: Vec<CaptionTrack>,
    pub generated: Vec<CaptionTrack>,
}

impl TranscriptList {
    /// Find a manually created track matching the preference list, in
    /// preference order.
    pub fn find_manual(&self, languages: &[String]) -> Result<&CaptionTrack, CaptionsError> {
        Self::find_in(&self.manual, languages)
    }

    /// Find an auto-generated track matching the preference list.
    pub fn find_generated(&self, languages: &[String]) -> Result<&CaptionTrack, CaptionsError> {
        Self::find_in(&self.generated, languages)
    }

    fn find_in<'a>(
        tracks: &'a [CaptionTrack],
        languages: &[String],
    ) -> Result<&'a CaptionTrack, CaptionsError> {
        for lang in languages {
            if let Some(track) = tracks
                .iter()
                .find(|t| t.language_code.eq_ignore_ascii_case(lang))
            {
                return Ok(track);
            }
        }
        Err(CaptionsError::NoTranscript {
            languages: languages.to_vec(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.manual.is_empty() && self.generated.is_empty()
    }
}

/// HTTP client for the structured captions API.
pub struct CaptionClient {
    client: reqwest::Client,
}

impl CaptionClient {
    pub fn new(timeout: Duration) -> crate::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// List all caption tracks the video exposes.
    pub async fn list_transcripts(&self, video: &VideoId) -> Result<TranscriptList, CaptionsError> {
        let html = self.fetch_text(&video.watch_url()).await?;
        let api_key = extract_api_key(&html)?;
        let player_data = self.fetch_player_data(video, &api_key).await?;
        extract_track_list(&player_data)
    }

    /// Fetch one track's body and return its segment texts in order.
    pub async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<String>, CaptionsError> {
        let xml = self.fetch_text(&track.base_url).await?;
        let segments = parse_timedtext_segments(&xml);
        if segments.is_empty() {
            return Err(CaptionsError::Parse(
                "no <text> elements in track body".to_string(),
            ));
        }
        Ok(segments)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, CaptionsError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CaptionsError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CaptionsError::Http(format!("HTTP {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| CaptionsError::Http(e.to_string()))
    }

    async fn fetch_player_data(
        &self,
        video: &VideoId,
        api_key: &str,
    ) -> Result<Value, CaptionsError> {
        let url = format!("{}{}", PLAYER_API_URL, api_key);
        let context = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video.as_str()
        });

        let response = self
            .client
            .post(&url)
            .json(&context)
            .send()
            .await
            .map_err(|e| CaptionsError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CaptionsError::Http(format!("HTTP {}", response.status())));
        }

        response
            .json()
            .await
            .map_err(|e| CaptionsError::Parse(e.to_string()))
    }
}

fn extract_api_key(html: &str) -> Result<String, CaptionsError> {
    API_KEY_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| CaptionsError::Parse("INNERTUBE_API_KEY not found in page".to_string()))
}

fn extract_track_list(player_data: &Value) -> Result<TranscriptList, CaptionsError> {
    let renderer = player_data
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .ok_or(CaptionsError::Disabled)?;

    let mut list = TranscriptList::default();

    if let Some(tracks) = renderer.get("captionTracks").and_then(|ct| ct.as_array()) {
        for track in tracks {
            let language_code = match track.get("languageCode").and_then(|l| l.as_str()) {
                Some(lc) => lc.to_string(),
                None => continue,
            };
            let base_url = match track.get("baseUrl").and_then(|u| u.as_str()) {
                Some(url) => url.replace("&fmt=srv3", ""),
                None => continue,
            };
            let kind = match track.get("kind").and_then(|k| k.as_str()) {
                Some("asr") => TrackKind::Generated,
                _ => TrackKind::Manual,
            };

            let entry = CaptionTrack {
                language_code,
                kind,
                base_url,
            };
            match kind {
                TrackKind::Manual => list.manual.push(entry),
                TrackKind::Generated => list.generated.push(entry),
            }
        }
    }

    if list.is_empty() {
        return Err(CaptionsError::Disabled);
    }

    Ok(list)
}

/// Parse a timedtext XML body into ordered segment texts.
///
/// Inner markup is stripped and HTML entities decoded; timing attributes are
/// not needed by the output contract and are discarded.
pub(crate) fn parse_timedtext_segments(xml: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut rest = xml;

    while let Some(open) = rest.find("<text") {
        let after_open = &rest[open..];
        let Some(gt) = after_open.find('>') else { break };
        let body_start = &after_open[gt + 1..];
        let Some(close) = body_start.find("</text>") else { break };

        let raw = &body_start[..close];
        let stripped = strip_tags(raw);
        let decoded = html_escape::decode_html_entities(&stripped).to_string();
        segments.push(decoded);

        rest = &body_start[close + "</text>".len()..];
    }

    segments
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
