//! Timestamp Codec
//!
//! Converts between format-specific timestamp strings and seconds.
//!
//! | Format | Layout          | Fraction      |
//! |--------|-----------------|---------------|
//! | SRT    | `HH:MM:SS,mmm`  | milliseconds  |
//! | VTT    | `HH:MM:SS.mmm`  | milliseconds  |
//! | ASS    | `H:MM:SS.cc`    | centiseconds  |
//!
//! Parsing is strict: anything that is not exactly the layout above fails with
//! [`CoreError::MalformedTimestamp`]. Callers decide whether that is fatal.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::{CoreError, CoreResult, TimeSec};

static SRT_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2}),([0-9]{3})$").expect("valid SRT pattern")
});

static VTT_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})\.([0-9]{3})$").expect("valid VTT pattern")
});

static ASS_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+):([0-9]{2}):([0-9]{2})\.([0-9]{2})$").expect("valid ASS pattern")
});

const MILLIS: f64 = 1000.0;
const CENTIS: f64 = 100.0;

// =============================================================================
// Parsing
// =============================================================================

/// Parses `HH:MM:SS,mmm` into seconds
pub fn parse_srt_timestamp(ts: &str) -> CoreResult<TimeSec> {
    parse_with(&SRT_TIMESTAMP, ts, MILLIS)
}

/// Parses a WebVTT timestamp (e.g., "00:01:23.456") into seconds
pub fn parse_vtt_timestamp(ts: &str) -> CoreResult<TimeSec> {
    parse_with(&VTT_TIMESTAMP, ts, MILLIS)
}

/// Parses an ASS/SSA timestamp (e.g., "0:01:23.45") into seconds
pub fn parse_ass_timestamp(ts: &str) -> CoreResult<TimeSec> {
    parse_with(&ASS_TIMESTAMP, ts, CENTIS)
}

fn parse_with(pattern: &Regex, ts: &str, scale: f64) -> CoreResult<TimeSec> {
    let trimmed = ts.trim();
    let caps = pattern
        .captures(trimmed)
        .ok_or_else(|| CoreError::MalformedTimestamp(ts.to_string()))?;

    let field = |i: usize| -> CoreResult<f64> {
        caps[i]
            .parse::<u64>()
            .map(|v| v as f64)
            .map_err(|_| CoreError::MalformedTimestamp(ts.to_string()))
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let fraction = field(4)?;

    Ok(hours * 3600.0 + minutes * 60.0 + seconds + fraction / scale)
}

// =============================================================================
// Formatting
// =============================================================================

/// Splits non-negative seconds into (hours, minutes, seconds, fraction) at the
/// given precision, rounding to the nearest unit.
fn split(seconds: TimeSec, scale: f64) -> (u64, u64, u64, u64) {
    let per_sec = scale as u64;
    let units = (seconds.max(0.0) * scale).round() as u64;
    let whole_secs = units / per_sec;
    (
        whole_secs / 3600,
        (whole_secs / 60) % 60,
        whole_secs % 60,
        units % per_sec,
    )
}

/// Formats seconds as `HH:MM:SS,mmm`
pub fn format_srt_timestamp(seconds: TimeSec) -> String {
    let (h, m, s, ms) = split(seconds, MILLIS);
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

/// Formats seconds as `HH:MM:SS.mmm`
pub fn format_vtt_timestamp(seconds: TimeSec) -> String {
    let (h, m, s, ms) = split(seconds, MILLIS);
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
}

/// Formats seconds as a short playback clock ("M:SS"), truncating fractions.
pub fn format_clock(seconds: TimeSec) -> String {
    let whole = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", whole / 60, whole % 60)
}

// =============================================================================
// Tests
// =============================================================================
