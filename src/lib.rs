//! ytfetch - A Rust CLI tool for fetching YouTube transcripts
//!
//! This library retrieves a transcript for a video by trying several independent
//! strategies in priority order (structured captions API, watch-page scraping,
//! audio transcription as a last resort) and can produce a condensed extractive
//! summary of the result.

pub mod captions;
pub mod cli;
pub mod config;
pub mod output;
pub mod resolver;
pub mod sources;
pub mod summary;
pub mod utils;
pub mod video;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use resolver::{TranscriptResolver, TranscriptResult};
pub use sources::{CaptionSource, SourceOutcome};
pub use video::VideoId;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the fetcher
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Could not extract an 11-character video ID from: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output failed: {0}")]
    OutputError(String),
}
