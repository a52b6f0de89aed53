//! Bundled demo transcript
//!
//! A short lecture excerpt used by `keyscribe-cli play --demo` and by tests
//! that need realistic data.

use crate::core::{
    formats::{parse_json, TranscriptFormat},
    settings::KeywordSettings,
    transcript::{Transcript, TranscriptBuilder},
    CoreResult,
};

/// Raw JSON of the demo transcript
pub const DEMO_TRANSCRIPT_JSON: &str = include_str!("../../fixtures/demo_transcript.json");

/// Format of [`DEMO_TRANSCRIPT_JSON`]
pub const DEMO_FORMAT: TranscriptFormat = TranscriptFormat::Json;

/// Builds the demo transcript with the given keyword settings
pub fn demo_transcript(keywords: &KeywordSettings) -> CoreResult<Transcript> {
    let parsed = parse_json(DEMO_TRANSCRIPT_JSON)?;
    let (transcript, _) = TranscriptBuilder::with_keyword_settings(keywords).build(parsed.cues);
    Ok(transcript)
}
