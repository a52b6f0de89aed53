//! CLI error types

use thiserror::Error;

/// Argument errors clap cannot express
#[derive(Error, Debug)]
pub enum CliError {
    #[error("No transcript given: pass a file or --demo")]
    MissingTranscript,

    #[error("Invalid time: {0}")]
    InvalidTime(f64),

    #[error("Invalid playback speed: {0} (must be above 0 and at most 1000)")]
    InvalidSpeed(f64),

    #[error("Invalid range: --until {until} is before --from {from}")]
    InvalidRange { from: f64, until: f64 },

    #[error("Tick interval must be at least 1 ms")]
    InvalidTick,
}
