use crate::config::AudioConfig;

/// Maximum length of the message payload carried inside a diagnostic note
const NOTE_MESSAGE_LIMIT: usize = 160;

/// Truncate an error message for inclusion in a diagnostic note.
///
/// Notes must stay human-scannable; upstream errors (HTTP bodies, parser
/// dumps) can be arbitrarily long.
pub fn truncate_message(message: &str) -> String {
    if message.chars().count() <= NOTE_MESSAGE_LIMIT {
        return message.to_string();
    }

    let truncated: String = message.chars().take(NOTE_MESSAGE_LIMIT).collect();
    format!("{}...", truncated)
}

/// Check that the external tools the audio fallback needs are present
pub async fn check_dependencies(audio: &AudioConfig) -> Vec<String> {
    let mut missing = Vec::new();

    if !audio.enabled {
        return missing;
    }

    if !check_command_available(&audio.yt_dlp_path, "--version").await {
        missing.push(format!(
            "{} - required for audio download",
            audio.yt_dlp_path
        ));
    }

    if audio.clip_seconds.is_some() && !check_command_available(&audio.ffmpeg_path, "-version").await {
        missing.push(format!("{} - required for audio trimming", audio.ffmpeg_path));
    }

    if !check_command_available(&audio.whisper_path, "--help").await {
        missing.push(format!(
            "{} - required for speech-to-text",
            audio.whisper_path
        ));
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str, probe_arg: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg(probe_arg)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_message_unchanged() {
        assert_eq!(truncate_message("network timed out"), "network timed out");
    }

    #[test]
    fn test_truncate_long_message() {
        let long = "x".repeat(500);
        let truncated = truncate_message(&long);
        assert_eq!(truncated.chars().count(), NOTE_MESSAGE_LIMIT + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_message(&long);
        assert!(truncated.ends_with("..."));
    }

    #[tokio::test]
    async fn test_disabled_audio_needs_nothing() {
        let audio = AudioConfig {
            enabled: false,
            yt_dlp_path: "definitely-not-a-real-tool".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            whisper_path: "whisper".to_string(),
            whisper_model: "tiny".to_string(),
            clip_seconds: None,
        };
        assert!(check_dependencies(&audio).await.is_empty());
    }
}
