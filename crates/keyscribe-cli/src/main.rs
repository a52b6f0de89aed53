//! keyscribe-cli
//!
//! Headless front end for the keyscribe engine: parse and convert transcripts,
//! query them at a point in time, and simulate playback in the terminal.

mod error;
mod play;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use keyscribe_lib::core::formats::{export_json, export_srt, export_vtt};
use keyscribe_lib::core::sample::{DEMO_FORMAT, DEMO_TRANSCRIPT_JSON};
use keyscribe_lib::core::text::KeywordExtractor;
use keyscribe_lib::core::transcript::{ActiveKeyword, UtteranceStatus};
use keyscribe_lib::{ingest, EngineSettings, IngestSummary, PlaybackSession, Transcript, Utterance};

use crate::error::CliError;
use crate::play::PlayOptions;

/// keyscribe command line
#[derive(Parser, Debug)]
#[command(name = "keyscribe-cli", author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine settings file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a transcript and print it as JSON
    Parse {
        /// Transcript file
        file: PathBuf,
        /// Source format (json, srt, vtt, ass, ssa, txt); defaults to the file extension
        #[arg(short, long)]
        format: Option<String>,
        /// Print the plain transcript text instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Convert a transcript to another format
    Convert {
        /// Transcript file
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum)]
        to: ExportFormat,
        /// Source format; defaults to the file extension
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Show the active utterance and keywords at a point in time
    Query {
        /// Transcript file
        file: PathBuf,
        /// Playback time in seconds
        #[arg(long)]
        at: f64,
        /// Source format; defaults to the file extension
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Write the effective settings to a JSON file
    InitConfig {
        /// Destination file
        path: PathBuf,
    },

    /// Extract keywords from text
    Keywords {
        /// Text to analyze
        text: String,
    },

    /// Simulate playback and print utterances and keywords as they appear
    Play {
        /// Transcript file (omit with --demo)
        file: Option<PathBuf>,
        /// Play the bundled demo transcript
        #[arg(long, conflicts_with = "file")]
        demo: bool,
        /// Start time in seconds
        #[arg(long, default_value_t = 0.0)]
        from: f64,
        /// Stop time in seconds; defaults to the end of the transcript
        #[arg(long)]
        until: Option<f64>,
        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
        /// Seed for a reproducible reveal cadence
        #[arg(long)]
        seed: Option<u64>,
        /// Clock tick interval in milliseconds
        #[arg(long, default_value_t = 50)]
        tick_ms: u64,
        /// Source format; defaults to the file extension
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Srt,
    Vtt,
    Json,
}

/// Output of the `query` command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryReport<'a> {
    time: f64,
    progress: f64,
    active_utterance: Option<&'a Utterance>,
    status: Option<UtteranceStatus>,
    active_keywords: Vec<ActiveKeyword>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { file, format, text } => {
            let (transcript, _) = load_transcript(&file, format.as_deref(), &settings)?;
            if text {
                println!("{}", transcript.full_text());
            } else {
                println!("{}", export_json(&transcript)?);
            }
        }
        Commands::InitConfig { path } => {
            let written = settings
                .save(&path)
                .with_context(|| format!("Failed to write settings to {}", path.display()))?;
            info!(
                "Wrote settings (version {}) to {}",
                written.version,
                path.display()
            );
        }
        Commands::Convert { file, to, format } => {
            let (transcript, _) = load_transcript(&file, format.as_deref(), &settings)?;
            let output = match to {
                ExportFormat::Srt => export_srt(&transcript),
                ExportFormat::Vtt => export_vtt(&transcript),
                ExportFormat::Json => export_json(&transcript)?,
            };
            print!("{}", output);
        }
        Commands::Query { file, at, format } => {
            if !at.is_finite() {
                return Err(CliError::InvalidTime(at).into());
            }
            let (transcript, _) = load_transcript(&file, format.as_deref(), &settings)?;
            let active_utterance = transcript.active_utterance(at);
            let report = QueryReport {
                time: at,
                progress: transcript.progress(at),
                active_utterance,
                status: active_utterance.and_then(|u| transcript.status_at(u.id, at)),
                active_keywords: transcript.active_keywords(at, settings.lifecycle.grace_secs),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Keywords { text } => {
            let extractor = KeywordExtractor::from_settings(&settings.keywords);
            for keyword in extractor.extract(&text) {
                println!("{}", keyword);
            }
        }
        Commands::Play {
            file,
            demo,
            from,
            until,
            speed,
            seed,
            tick_ms,
            format,
        } => {
            let options = PlayOptions::new(from, until, speed, Duration::from_millis(tick_ms))?;

            let mut session = match seed {
                Some(seed) => PlaybackSession::seeded(settings, seed),
                None => PlaybackSession::new(settings),
            };

            if demo {
                session.ingest(DEMO_TRANSCRIPT_JSON, &DEMO_FORMAT.to_string())?;
            } else {
                let path = file.ok_or(CliError::MissingTranscript)?;
                let raw = read_transcript(&path)?;
                let hint = format_hint(&path, format.as_deref());
                let summary = session
                    .ingest(&raw, &hint)
                    .with_context(|| format!("Failed to ingest {}", path.display()))?;
                report_losses(&summary);
            }

            let summary = play::run(&mut session, &options).await?;
            info!(
                "Shown {} utterances and {} keywords{}",
                summary.utterances_shown,
                summary.keywords_shown,
                if summary.interrupted { " (interrupted)" } else { "" }
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Diagnostics go to stderr so command output stays pipeable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_settings(path: Option<&Path>) -> Result<EngineSettings> {
    match path {
        Some(path) => EngineSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(EngineSettings::default()),
    }
}

fn read_transcript(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn format_hint(path: &Path, format: Option<&str>) -> String {
    match format {
        Some(format) => format.to_string(),
        None => path.to_string_lossy().into_owned(),
    }
}

fn load_transcript(
    path: &Path,
    format: Option<&str>,
    settings: &EngineSettings,
) -> Result<(Transcript, IngestSummary)> {
    let raw = read_transcript(path)?;
    let hint = format_hint(path, format);
    let outcome = ingest(&raw, &hint, settings)
        .with_context(|| format!("Failed to ingest {}", path.display()))?;

    let (transcript, summary) = outcome.into_parts();
    report_losses(&summary);
    Ok((transcript, summary))
}

fn report_losses(summary: &IngestSummary) {
    if summary.has_losses() {
        warn!(
            "{} unreadable and {} invalid cues were left out",
            summary.skipped, summary.dropped
        );
    } else {
        info!("All {} cues loaded", summary.utterances);
    }
}
