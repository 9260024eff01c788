use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::OnceCell;

use super::{CaptionSource, SourceOutcome};
use crate::config::{AudioConfig, FetchConfig};
use crate::utils::truncate_message;
use crate::video::VideoId;
use crate::Result;

/// Shared speech-to-text handle.
///
/// Created once and reused across calls; the availability probe runs lazily
/// exactly once. Safe for concurrent use: transcription runs are independent
/// subprocess invocations.
pub struct SpeechTranscriber {
    whisper_path: String,
    model: String,
    available: OnceCell<bool>,
}

impl SpeechTranscriber {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            whisper_path: config.whisper_path.clone(),
            model: config.whisper_model.clone(),
            available: OnceCell::new(),
        }
    }

    pub async fn is_available(&self) -> bool {
        *self
            .available
            .get_or_init(|| async {
                Command::new(&self.whisper_path)
                    .arg("--help")
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .output()
                    .await
                    .map(|output| output.status.success())
                    .unwrap_or(false)
            })
            .await
    }

    /// Run speech-to-text over an audio file and return the recognized text
    pub async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<String> {
        let output_dir = audio_path
            .parent()
            .context("audio file has no parent directory")?;

        let mut cmd = Command::new(&self.whisper_path);
        cmd.arg(audio_path)
            .arg("--model")
            .arg(&self.model)
            .arg("--output_dir")
            .arg(output_dir)
            .arg("--output_format")
            .arg("json")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(lang) = language {
            cmd.arg("--language").arg(lang);
        }

        let output = cmd.output().await.context("Failed to execute whisper")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("whisper failed: {}", stderr.trim());
        }

        let stem = audio_path
            .file_stem()
            .context("invalid audio filename")?
            .to_string_lossy();
        let json_path = output_dir.join(format!("{}.json", stem));

        let content = fs_err::read_to_string(&json_path)
            .context("Failed to read whisper output")?;
        let parsed: serde_json::Value =
            serde_json::from_str(&content).context("Failed to parse whisper output")?;

        Ok(parsed["text"].as_str().unwrap_or("").trim().to_string())
    }
}

/// Audio-transcription adapter: the last-resort path for videos that expose
/// no captions at all. Downloads the audio track, optionally trims it to
/// bound transcription cost, and runs speech-to-text on the result.
pub struct AudioSource {
    yt_dlp_path: String,
    ffmpeg_path: String,
    clip_seconds: Option<u64>,
    language: Option<String>,
    transcriber: Arc<SpeechTranscriber>,
}

impl AudioSource {
    pub fn new(
        audio: &AudioConfig,
        fetch: &FetchConfig,
        transcriber: Arc<SpeechTranscriber>,
    ) -> Self {
        // Whisper wants a bare language code, not a regional variant
        let language = fetch
            .languages
            .first()
            .map(|lang| lang.split('-').next().unwrap_or(lang).to_string());

        Self {
            yt_dlp_path: audio.yt_dlp_path.clone(),
            ffmpeg_path: audio.ffmpeg_path.clone(),
            clip_seconds: audio.clip_seconds,
            language,
            transcriber,
        }
    }

    /// Check if yt-dlp is available
    async fn check_availability(&self) -> bool {
        Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Download the audio track with yt-dlp
    async fn download_audio(&self, video: &VideoId, output_path: &Path) -> Result<()> {
        tracing::debug!("Downloading audio for: {}", video);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--output",
                &output_path.to_string_lossy(),
                "--extract-audio",
                "--audio-format",
                "mp3",
                // Lowest quality for speed (still good for transcription)
                "--audio-quality",
                "9",
                "--format",
                "worstaudio[acodec^=mp4a]/worstaudio[ext=m4a]/worstaudio[ext=mp3]/worstaudio",
                "--no-playlist",
                "--concurrent-fragments",
                "4",
                "--newline",
                &video.watch_url(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error.trim());
        }

        Ok(())
    }

    /// Trim audio to the configured clip length with ffmpeg
    async fn trim_audio(&self, source: &Path, target: &Path, seconds: u64) -> Result<()> {
        tracing::debug!("Trimming audio to {}s", seconds);

        let output = Command::new(&self.ffmpeg_path)
            .args([
                "-i",
                &source.to_string_lossy(),
                "-t",
                &seconds.to_string(),
                "-vn",
                "-acodec",
                "copy",
                "-y",
                &target.to_string_lossy(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffmpeg failed: {}", error.trim());
        }

        Ok(())
    }
}

#[async_trait]
impl CaptionSource for AudioSource {
    fn name(&self) -> &'static str {
        "audio-transcribe"
    }

    async fn attempt(&self, video: &VideoId) -> Result<SourceOutcome> {
        let mut notes = Vec::new();

        if !self.check_availability().await {
            notes.push(format!("{}: yt-dlp is not available", self.name()));
            return Ok(SourceOutcome::failure(notes));
        }

        if !self.transcriber.is_available().await {
            notes.push(format!("{}: whisper is not available", self.name()));
            return Ok(SourceOutcome::failure(notes));
        }

        // Scratch space removed on every exit path when the guard drops
        let temp_dir = match tempfile::TempDir::new() {
            Ok(dir) => dir,
            Err(err) => {
                notes.push(format!(
                    "{}: could not create temp directory: {}",
                    self.name(),
                    truncate_message(&err.to_string())
                ));
                return Ok(SourceOutcome::failure(notes));
            }
        };

        let audio_path = temp_dir.path().join(format!(
            "audio_{}.mp3",
            &uuid::Uuid::new_v4().to_string()[..8]
        ));

        if let Err(err) = self.download_audio(video, &audio_path).await {
            notes.push(format!(
                "{}: audio download failed: {}",
                self.name(),
                truncate_message(&err.to_string())
            ));
            return Ok(SourceOutcome::failure(notes));
        }

        let mut transcribe_path: PathBuf = audio_path.clone();
        if let Some(seconds) = self.clip_seconds {
            let clipped = temp_dir.path().join("clipped.mp3");
            match self.trim_audio(&audio_path, &clipped, seconds).await {
                Ok(()) => transcribe_path = clipped,
                Err(err) => {
                    // Degrade to the full-length audio rather than give up
                    notes.push(format!(
                        "{}: trim failed, transcribing full audio: {}",
                        self.name(),
                        truncate_message(&err.to_string())
                    ));
                }
            }
        }

        match self
            .transcriber
            .transcribe(&transcribe_path, self.language.as_deref())
            .await
        {
            Ok(text) if !text.is_empty() => Ok(SourceOutcome::success(text, notes)),
            Ok(_) => {
                notes.push(format!("{}: speech-to-text produced no text", self.name()));
                Ok(SourceOutcome::failure(notes))
            }
            Err(err) => {
                notes.push(format!(
                    "{}: speech-to-text failed: {}",
                    self.name(),
                    truncate_message(&err.to_string())
                ));
                Ok(SourceOutcome::failure(notes))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn unavailable_source() -> AudioSource {
        let mut config = Config::default();
        config.audio.yt_dlp_path = "definitely-not-a-real-tool".to_string();
        config.audio.whisper_path = "also-not-a-real-tool".to_string();
        let transcriber = Arc::new(SpeechTranscriber::new(&config.audio));
        AudioSource::new(&config.audio, &config.fetch, transcriber)
    }

    #[test]
    fn test_language_uses_bare_code() {
        let mut config = Config::default();
        config.fetch.languages = vec!["en-US".to_string()];
        let transcriber = Arc::new(SpeechTranscriber::new(&config.audio));
        let source = AudioSource::new(&config.audio, &config.fetch, transcriber);
        assert_eq!(source.language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_missing_tooling_fails_with_note() {
        let source = unavailable_source();
        let video = crate::video::extract("dQw4w9WgXcQ").unwrap();

        let outcome = source.attempt(&video).await.unwrap();
        assert!(!outcome.succeeded());
        assert_eq!(outcome.notes.len(), 1);
        assert!(outcome.notes[0].contains("yt-dlp is not available"));
    }

    #[tokio::test]
    async fn test_transcriber_probe_is_cached() {
        let config = Config::default();
        let mut audio = config.audio.clone();
        audio.whisper_path = "definitely-not-a-real-tool".to_string();
        let transcriber = SpeechTranscriber::new(&audio);

        assert!(!transcriber.is_available().await);
        // Second call answers from the cached probe
        assert!(!transcriber.is_available().await);
    }
}
