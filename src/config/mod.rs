use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Transcript retrieval settings
    pub fetch: FetchConfig,

    /// Audio-transcription fallback settings
    pub audio: AudioConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Language preference list, most preferred first
    pub languages: Vec<String>,

    /// Timeout for structured captions API calls, in seconds
    pub api_timeout_secs: u64,

    /// Timeout for watch-page and caption-file fetches, in seconds
    pub page_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Enable the audio-transcription last resort (requires external tools)
    pub enabled: bool,

    /// Path to the yt-dlp binary
    pub yt_dlp_path: String,

    /// Path to the ffmpeg binary
    pub ffmpeg_path: String,

    /// Path to the whisper binary
    pub whisper_path: String,

    /// Whisper model name
    pub whisper_model: String,

    /// Trim downloaded audio to this many seconds before transcription
    /// (bounds speech-to-text cost; unset transcribes the full audio)
    pub clip_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default output format
    pub default_output_format: String,

    /// Sentences to keep when summarizing
    pub summary_sentences: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig {
                languages: vec!["en".to_string(), "en-US".to_string(), "en-GB".to_string()],
                api_timeout_secs: 10,
                page_timeout_secs: 15,
            },
            audio: AudioConfig {
                enabled: false,
                yt_dlp_path: "yt-dlp".to_string(),
                ffmpeg_path: "ffmpeg".to_string(),
                whisper_path: "whisper".to_string(),
                whisper_model: "tiny".to_string(),
                clip_seconds: Some(600),
            },
            app: AppConfig {
                default_output_format: "text".to_string(),
                summary_sentences: 5,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Where the active configuration file lives
    pub fn location() -> Result<PathBuf> {
        Self::config_path()
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("ytfetch").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.fetch.languages.is_empty() {
            anyhow::bail!("At least one preferred language must be configured");
        }

        if self.fetch.api_timeout_secs == 0 || self.fetch.page_timeout_secs == 0 {
            anyhow::bail!("Network timeouts must be greater than zero");
        }

        if let Some(0) = self.audio.clip_seconds {
            anyhow::bail!("audio.clip_seconds must be greater than zero when set");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Languages: {}", self.fetch.languages.join(", "));
        println!("  API timeout: {}s", self.fetch.api_timeout_secs);
        println!("  Page timeout: {}s", self.fetch.page_timeout_secs);
        println!("  Audio fallback: {}", self.audio.enabled);
        if self.audio.enabled {
            println!("  Whisper model: {}", self.audio.whisper_model);
            match self.audio.clip_seconds {
                Some(secs) => println!("  Audio clip: {}s", secs),
                None => println!("  Audio clip: full length"),
            }
        }
        println!("  Default format: {}", self.app.default_output_format);
        println!("  Summary sentences: {}", self.app.summary_sentences);
    }
}
