use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::resolver::TranscriptResult;
use crate::video::VideoId;

pub mod formatters;

pub use formatters::*;

/// Save a transcript result to file
pub async fn save_to_file(
    video: &VideoId,
    result: &TranscriptResult,
    summary: Option<&str>,
    path: &Path,
    format: &OutputFormat,
    show_notes: bool,
) -> Result<()> {
    let content = render(video, result, summary, format, show_notes)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print a transcript result to console
pub fn print_to_console(
    video: &VideoId,
    result: &TranscriptResult,
    summary: Option<&str>,
    format: &OutputFormat,
    show_notes: bool,
) -> Result<()> {
    let content = render(video, result, summary, format, show_notes)?;
    println!("{}", content);
    Ok(())
}

fn render(
    video: &VideoId,
    result: &TranscriptResult,
    summary: Option<&str>,
    format: &OutputFormat,
    show_notes: bool,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_as_text(result, summary, show_notes)),
        OutputFormat::Json => format_as_json(video.as_str(), result, summary),
        OutputFormat::Notes => Ok(format_as_notes(result)),
    }
}
