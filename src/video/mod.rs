use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BARE_ID_RE: Regex = Regex::new(r"^[0-9A-Za-z_-]{11}$").unwrap();
    // The trailing class consumes the character after the token so that a
    // 12+ character run never yields a truncated 11-character match.
    static ref URL_ID_RE: Regex =
        Regex::new(r"(?:v=|/shorts/|youtu\.be/|/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)").unwrap();
}

/// Canonical 11-character YouTube video identifier.
///
/// Immutable once constructed; obtained through [`extract`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public watch page URL for this video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extract a canonical video ID from a URL or raw identifier.
///
/// Accepts a bare 11-character ID verbatim, otherwise searches for a token
/// following `v=`, `/shorts/`, `youtu.be/`, or a generic `/`. Trailing query
/// parameters are never part of the captured token. Returns `None` when no
/// valid token is found; the caller treats that as a user-input error.
pub fn extract(input: &str) -> Option<VideoId> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if BARE_ID_RE.is_match(input) {
        return Some(VideoId(input.to_string()));
    }

    URL_ID_RE
        .captures(input)
        .map(|caps| VideoId(caps[1].to_string()))
}
