use anyhow::Result;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod captions;
mod cli;
mod config;
mod output;
mod resolver;
mod sources;
mod summary;
mod utils;
mod video;

use cli::{Cli, Commands, OutputFormat};
use config::Config;
use resolver::TranscriptResolver;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_directive = if cli.verbose { "ytfetch=debug" } else { "ytfetch=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load().await?;

    match cli.command {
        Commands::Fetch {
            input,
            output,
            format,
            languages,
            audio_fallback,
            clip_seconds,
            summarize,
            sentences,
            show_notes,
        } => {
            // Command-line overrides on top of the config file
            if let Some(languages) = languages {
                config.fetch.languages = languages;
            }
            if audio_fallback {
                config.audio.enabled = true;
            }
            if let Some(secs) = clip_seconds {
                config.audio.clip_seconds = Some(secs);
            }
            let format = format.unwrap_or_else(|| {
                OutputFormat::from_str(&config.app.default_output_format, true)
                    .unwrap_or(OutputFormat::Text)
            });

            // Check for required external tools (non-fatal)
            let missing_deps = utils::check_dependencies(&config.audio).await;
            if !missing_deps.is_empty() {
                eprintln!("Dependency check warnings:");
                for dep in missing_deps {
                    eprintln!("   - {}", dep);
                }
                eprintln!("   (Continuing anyway - the audio fallback may not work)");
            }

            let video = match video::extract(&input) {
                Some(video) => video,
                None => anyhow::bail!(
                    "Could not extract a valid 11-character video ID from: {}",
                    input
                ),
            };

            tracing::info!("Resolving transcript for video: {}", video);

            let resolver = TranscriptResolver::new(&config)?;

            let progress = if cli.quiet {
                ProgressBar::hidden()
            } else {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {msg}")
                        .unwrap(),
                );
                spinner.enable_steady_tick(std::time::Duration::from_millis(120));
                spinner.set_message(format!("Retrieving transcript for {}...", video));
                spinner
            };

            let result = resolver.resolve(&video).await;
            progress.finish_and_clear();

            let wants_summary = summarize || sentences.is_some();
            let summary_text = if wants_summary && result.is_available() {
                Some(summary::summarize(
                    &result.text,
                    sentences.unwrap_or(config.app.summary_sentences),
                ))
            } else {
                None
            };

            match output {
                Some(path) => {
                    output::save_to_file(
                        &video,
                        &result,
                        summary_text.as_deref(),
                        &path,
                        &format,
                        show_notes,
                    )
                    .await?;
                    println!("Saved to: {}", path.display());
                }
                None => {
                    output::print_to_console(
                        &video,
                        &result,
                        summary_text.as_deref(),
                        &format,
                        show_notes,
                    )?;
                }
            }

            if !result.is_available() {
                eprintln!(
                    "{}",
                    console::style("Transcript not available for this video.").red()
                );
                std::process::exit(1);
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                println!("Edit the config file manually:");
                println!("  {}", Config::location()?.display());
            }
        }
        Commands::Sources => {
            let resolver = TranscriptResolver::new(&config)?;
            println!("Retrieval sources, in priority order:");
            for name in resolver.source_names() {
                println!("  - {}", name);
            }
            if !config.audio.enabled {
                println!("  (audio-transcribe is disabled; enable it in the config or with --audio-fallback)");
            }
        }
    }

    Ok(())
}
