//! Transcript Format Parsers and Exporters
//!
//! Supports parsing transcripts from:
//! - Structured JSON (the interchange format)
//! - SRT (SubRip)
//! - VTT (WebVTT)
//! - ASS/SSA (Advanced SubStation Alpha)
//! - Plain text (auto-timed, one cue per sentence)
//!
//! and exporting to SRT, VTT and JSON.
//!
//! Every parser produces raw [`RawCue`]s; validation, ordering and id
//! assignment happen later in the transcript builder. Cues whose timing line
//! is malformed are skipped and counted in [`ParseOutput::skipped`] rather than
//! failing the whole file.
//!
//! # Example
//!
//! ```rust,ignore
//! use keyscribe_lib::core::formats::{parse_content, TranscriptFormat};
//!
//! let format = TranscriptFormat::from_hint("lecture.srt")?;
//! let output = parse_content(&content, format, &settings.plain_text)?;
//! ```

mod ass;
mod export;
mod json;
mod plain;
mod srt;
mod vtt;

pub use ass::parse_ass;
pub use export::{export_json, export_srt, export_vtt};
pub use json::parse_json;
pub use plain::parse_plain_text;
pub use srt::parse_srt;
pub use vtt::parse_vtt;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{
    settings::PlainTextSettings, transcript::KeywordSpan, CoreError, CoreResult, TimeSec,
};

// =============================================================================
// Format Selection
// =============================================================================

/// Supported transcript source formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptFormat {
    /// Structured JSON array of utterances
    Json,
    /// SubRip
    Srt,
    /// WebVTT
    Vtt,
    /// Advanced SubStation Alpha / SubStation Alpha
    Ass,
    /// Plain text
    Txt,
}

impl TranscriptFormat {
    /// Resolves a format from a tag (`"srt"`), an extension (`".srt"`) or a
    /// file name (`"talk.SRT"`), case-insensitively.
    pub fn from_hint(hint: &str) -> CoreResult<Self> {
        let trimmed = hint.trim();
        let tag = trimmed.rsplit('.').next().unwrap_or(trimmed);

        match tag.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "ass" | "ssa" => Ok(Self::Ass),
            "txt" => Ok(Self::Txt),
            _ => Err(CoreError::UnsupportedFormat(hint.to_string())),
        }
    }

    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TranscriptFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hint(s)
    }
}

// =============================================================================
// Parser Output
// =============================================================================

/// One not-yet-validated timed text unit as produced by a parser
#[derive(Clone, Debug, PartialEq)]
pub struct RawCue {
    /// Start time in seconds
    pub start_time: TimeSec,
    /// End time in seconds
    pub end_time: TimeSec,
    /// Cue text with inline markup already stripped
    pub raw_text: String,
    /// Keywords supplied by the source, if any (otherwise extracted later)
    pub keywords: Option<Vec<KeywordSpan>>,
}

impl RawCue {
    pub fn new(start_time: TimeSec, end_time: TimeSec, raw_text: &str) -> Self {
        Self {
            start_time,
            end_time,
            raw_text: raw_text.to_string(),
            keywords: None,
        }
    }

    /// Attaches source-provided keywords
    pub fn with_keywords(mut self, keywords: Vec<KeywordSpan>) -> Self {
        self.keywords = Some(keywords);
        self
    }
}

/// Cues parsed from one source plus diagnostics
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseOutput {
    /// Parsed cues in source order
    pub cues: Vec<RawCue>,
    /// Blocks/lines that looked like cues but could not be parsed
    pub skipped: usize,
}

// =============================================================================
// Dispatch
// =============================================================================

/// Parses `content` with the parser for `format`
pub fn parse_content(
    content: &str,
    format: TranscriptFormat,
    plain: &PlainTextSettings,
) -> CoreResult<ParseOutput> {
    match format {
        TranscriptFormat::Json => parse_json(content),
        TranscriptFormat::Srt => Ok(parse_srt(content)),
        TranscriptFormat::Vtt => Ok(parse_vtt(content)),
        TranscriptFormat::Ass => Ok(parse_ass(content)),
        TranscriptFormat::Txt => Ok(parse_plain_text(content, plain.sentence_secs)),
    }
}

/// Splits a `start --> end` timing line and parses both sides with `parse`.
///
/// Anything after the end timestamp (VTT cue settings, SRT coordinates) is ignored.
pub(crate) fn parse_timing_line(
    line: &str,
    parse: fn(&str) -> CoreResult<TimeSec>,
) -> CoreResult<(TimeSec, TimeSec)> {
    let (start_part, end_part) = line.split_once("-->").ok_or_else(|| {
        CoreError::MalformedTimestamp(format!("Expected 'start --> end' format: {}", line))
    })?;

    let end_part = end_part.trim();
    let end_str = end_part.split_whitespace().next().unwrap_or(end_part);

    let start = parse(start_part.trim())?;
    let end = parse(end_str)?;

    Ok((start, end))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timecode::parse_srt_timestamp;

    #[test]
    fn test_from_hint_accepts_tags_extensions_and_filenames() {
        assert_eq!(TranscriptFormat::from_hint("srt").unwrap(), TranscriptFormat::Srt);
        assert_eq!(TranscriptFormat::from_hint(".VTT").unwrap(), TranscriptFormat::Vtt);
        assert_eq!(TranscriptFormat::from_hint("talk.Json").unwrap(), TranscriptFormat::Json);
        assert_eq!(TranscriptFormat::from_hint("ssa").unwrap(), TranscriptFormat::Ass);
        assert_eq!(TranscriptFormat::from_hint("ASS").unwrap(), TranscriptFormat::Ass);
        assert_eq!(
            TranscriptFormat::from_hint("notes/readme.txt").unwrap(),
            TranscriptFormat::Txt
        );
    }

    #[test]
    fn test_from_hint_rejects_unknown() {
        for hint in ["docx", "movie.mp4", "", "srt2"] {
            assert!(matches!(
                TranscriptFormat::from_hint(hint),
                Err(CoreError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn test_format_display_and_from_str() {
        assert_eq!(TranscriptFormat::Ass.to_string(), "ass");
        assert_eq!("srt".parse::<TranscriptFormat>().unwrap(), TranscriptFormat::Srt);
    }

    #[test]
    fn test_parse_timing_line() {
        let (start, end) =
            parse_timing_line("00:00:01,000 --> 00:00:03,500", parse_srt_timestamp).unwrap();
        assert_eq!(start, 1.0);
        assert_eq!(end, 3.5);

        let (_, end) = parse_timing_line(
            "00:00:01,000 --> 00:00:03,500 X1:40 X2:600",
            parse_srt_timestamp,
        )
        .unwrap();
        assert_eq!(end, 3.5);

        assert!(parse_timing_line("00:00:01,000 00:00:03,500", parse_srt_timestamp).is_err());
    }

    #[test]
    fn test_parse_content_dispatches() {
        let output = parse_content(
            "One. Two!",
            TranscriptFormat::Txt,
            &PlainTextSettings::default(),
        )
        .unwrap();
        assert_eq!(output.cues.len(), 2);

        let result = parse_content("not json", TranscriptFormat::Json, &PlainTextSettings::default());
        assert!(matches!(result, Err(CoreError::MalformedContent(_))));
    }
}
