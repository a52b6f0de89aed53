//! ASS/SSA parser.
//!
//! Only `Dialogue:` event lines are cues. The event format is fixed:
//!
//! ```text
//! Dialogue: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
//! ```
//!
//! Text is the tenth field onward, since dialogue may itself contain commas.

use tracing::debug;

use super::{ParseOutput, RawCue};
use crate::core::{text::normalize_ass_text, timecode::parse_ass_timestamp};

const DIALOGUE_PREFIX: &str = "Dialogue:";
const TEXT_FIELD: usize = 9;

/// Parses ASS/SSA content into raw cues
pub fn parse_ass(content: &str) -> ParseOutput {
    let mut output = ParseOutput::default();

    for line in content.lines() {
        let line = line.trim_end();
        if !line.starts_with(DIALOGUE_PREFIX) {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() <= TEXT_FIELD {
            debug!("Skipping dialogue line with {} fields", fields.len());
            output.skipped += 1;
            continue;
        }

        let timing = parse_ass_timestamp(fields[1])
            .and_then(|start| parse_ass_timestamp(fields[2]).map(|end| (start, end)));
        let (start_time, end_time) = match timing {
            Ok(timing) => timing,
            Err(e) => {
                debug!("Skipping dialogue line: {}", e);
                output.skipped += 1;
                continue;
            }
        };

        let text = normalize_ass_text(&fields[TEXT_FIELD..].join(","));
        output.cues.push(RawCue::new(start_time, end_time, &text));
    }

    output
}
