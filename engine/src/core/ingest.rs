//! Transcript ingestion
//!
//! Format detection, parsing and model building in one call.

use serde::Serialize;
use tracing::info;

use crate::core::{
    formats::{parse_content, TranscriptFormat},
    settings::EngineSettings,
    transcript::{Transcript, TranscriptBuilder},
    CoreResult,
};

/// Result of a successful ingest
#[derive(Clone, Debug, PartialEq)]
pub struct IngestOutcome {
    /// Detected source format
    pub format: TranscriptFormat,
    /// Built transcript (may be empty)
    pub transcript: Transcript,
    /// Source blocks the parser could not read
    pub skipped: usize,
    /// Parsed cues dropped by the builder (invalid timing, empty text)
    pub dropped: usize,
}

impl IngestOutcome {
    /// Splits the outcome into the transcript and its diagnostics
    pub fn into_parts(self) -> (Transcript, IngestSummary) {
        let summary = IngestSummary {
            format: self.format,
            utterances: self.transcript.len(),
            skipped: self.skipped,
            dropped: self.dropped,
        };
        (self.transcript, summary)
    }
}

/// Ingest diagnostics without the transcript itself
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub format: TranscriptFormat,
    pub utterances: usize,
    pub skipped: usize,
    pub dropped: usize,
}

impl IngestSummary {
    /// Returns true if any part of the source was discarded
    pub fn has_losses(&self) -> bool {
        self.skipped > 0 || self.dropped > 0
    }
}

/// Parses `raw` according to `format_hint` (an extension or file name) and
/// builds a transcript.
///
/// Fails only for an unknown format or content that cannot be read at all;
/// individual bad cues are skipped and counted.
pub fn ingest(raw: &str, format_hint: &str, settings: &EngineSettings) -> CoreResult<IngestOutcome> {
    let format = TranscriptFormat::from_hint(format_hint)?;
    let parsed = parse_content(raw, format, &settings.plain_text)?;

    let builder = TranscriptBuilder::with_keyword_settings(&settings.keywords);
    let (transcript, report) = builder.build(parsed.cues);

    info!(
        "Ingested {} transcript: {} utterances, {} skipped, {} dropped",
        format,
        transcript.len(),
        parsed.skipped,
        report.dropped()
    );

    Ok(IngestOutcome {
        format,
        transcript,
        skipped: parsed.skipped,
        dropped: report.dropped(),
    })
}
