use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytfetch",
    about = "Fetch YouTube transcripts with layered fallbacks",
    version,
    long_about = "A CLI tool for retrieving YouTube video transcripts. Tries the structured captions API first, falls back to scraping the watch page, and can transcribe the audio track as a last resort. Optionally condenses the result into an extractive summary."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the transcript for a video
    Fetch {
        /// Watch URL, shortened URL, shorts URL, or raw 11-character video ID
        #[arg(value_name = "URL_OR_ID")]
        input: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (defaults to the configured default)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Comma-separated language preference list (overrides config)
        #[arg(short, long, value_name = "LANGS", value_delimiter = ',')]
        languages: Option<Vec<String>>,

        /// Enable the audio-transcription fallback for this run
        #[arg(long)]
        audio_fallback: bool,

        /// Trim downloaded audio to this many seconds before transcription
        #[arg(long, value_name = "SECONDS")]
        clip_seconds: Option<u64>,

        /// Append an extractive summary of the transcript
        #[arg(long)]
        summarize: bool,

        /// Sentences to keep when summarizing (implies --summarize)
        #[arg(long, value_name = "COUNT")]
        sentences: Option<usize>,

        /// Show diagnostic notes even when a transcript was found
        #[arg(long)]
        show_notes: bool,
    },

    /// Show or edit fetcher settings
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// List retrieval sources in priority order
    Sources,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain transcript text
    Text,
    /// JSON report with text and diagnostic notes
    Json,
    /// Diagnostic notes only
    Notes,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Notes => write!(f, "notes"),
        }
    }
}
