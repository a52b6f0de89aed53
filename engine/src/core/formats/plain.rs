//! Plain text parser.
//!
//! Plain text has no timing, so each sentence is given a fixed synthetic slot
//! laid out back-to-back from zero.

use std::sync::LazyLock;

use regex::Regex;

use super::{ParseOutput, RawCue};
use crate::core::{text::collapse_whitespace, TimeSec};

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence pattern"));

/// Parses plain text: one cue per sentence, each `sentence_secs` long
pub fn parse_plain_text(content: &str, sentence_secs: TimeSec) -> ParseOutput {
    let cues = SENTENCE_END
        .split(content)
        .map(collapse_whitespace)
        .filter(|sentence| !sentence.is_empty())
        .enumerate()
        .map(|(k, sentence)| {
            let start = k as f64 * sentence_secs;
            RawCue::new(start, start + sentence_secs, &sentence)
        })
        .collect();

    ParseOutput { cues, skipped: 0 }
}
