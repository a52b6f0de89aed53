//! WebVTT parser.

use tracing::debug;

use super::{parse_timing_line, ParseOutput, RawCue};
use crate::core::{
    text::{collapse_whitespace, strip_angle_markup},
    timecode::parse_vtt_timestamp,
};

/// A cue whose timing line has been read and whose text is being collected
struct OpenCue {
    start_time: f64,
    end_time: f64,
    lines: Vec<String>,
}

impl OpenCue {
    fn close(self, output: &mut ParseOutput) {
        if self.lines.is_empty() {
            return;
        }
        let text = collapse_whitespace(&self.lines.join(" "));
        output
            .cues
            .push(RawCue::new(self.start_time, self.end_time, &text));
    }
}

/// Parses WebVTT content into raw cues
///
/// # VTT Format
///
/// ```text
/// WEBVTT
///
/// 00:00:01.000 --> 00:00:04.000
/// First caption text
///
/// intro
/// 00:00:05.500 --> 00:00:08.000 align:start
/// <v Speaker>Second caption text</v>
/// ```
///
/// A line containing `-->` opens a cue; following non-blank lines are its text
/// until a blank line or the end of input. Header, `NOTE` lines and cue
/// identifiers outside a cue are ignored. A timing line that fails to parse is
/// skipped together with its text.
pub fn parse_vtt(content: &str) -> ParseOutput {
    let mut output = ParseOutput::default();
    let mut current: Option<OpenCue> = None;
    // True while inside the text of a cue whose timing line was rejected
    let mut discarding = false;

    for raw_line in content.lines() {
        let line = raw_line.trim();

        if line.is_empty() {
            if let Some(cue) = current.take() {
                cue.close(&mut output);
            }
            discarding = false;
            continue;
        }

        if line.contains("-->") {
            if let Some(cue) = current.take() {
                cue.close(&mut output);
            }
            match parse_timing_line(line, parse_vtt_timestamp) {
                Ok((start_time, end_time)) => {
                    current = Some(OpenCue {
                        start_time,
                        end_time,
                        lines: Vec::new(),
                    });
                    discarding = false;
                }
                Err(e) => {
                    debug!("Skipping VTT cue: {}", e);
                    output.skipped += 1;
                    discarding = true;
                }
            }
            continue;
        }

        if discarding || line.starts_with("WEBVTT") || line.starts_with("NOTE") {
            continue;
        }

        if let Some(cue) = current.as_mut() {
            cue.lines.push(strip_angle_markup(line));
        }
    }

    if let Some(cue) = current.take() {
        cue.close(&mut output);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vtt_basic() {
        let vtt = r#"WEBVTT

00:00:01.000 --> 00:00:04.000
Hello World

00:00:05.500 --> 00:00:08.000
Second caption
"#;

        let output = parse_vtt(vtt);
        assert_eq!(output.cues.len(), 2);

        assert_eq!(output.cues[0].start_time, 1.0);
        assert_eq!(output.cues[0].end_time, 4.0);
        assert_eq!(output.cues[0].raw_text, "Hello World");
        assert_eq!(output.cues[1].start_time, 5.5);
    }

    #[test]
    fn test_parse_vtt_with_cue_identifiers_and_settings() {
        let vtt = r#"WEBVTT

cue1
00:00:01.000 --> 00:00:04.000 align:start position:10%
First cue

cue2
00:00:05.000 --> 00:00:08.000
Second cue
"#;

        let output = parse_vtt(vtt);
        assert_eq!(output.cues.len(), 2);
        assert_eq!(output.cues[0].raw_text, "First cue");
        assert_eq!(output.cues[0].end_time, 4.0);
    }

    #[test]
    fn test_parse_vtt_with_tags_and_multiple_lines() {
        let vtt = r#"WEBVTT

00:00:01.000 --> 00:00:04.000
<v Speaker>Hello World</v>

00:00:05.000 --> 00:00:08.000
<b>Bold</b> and
<i>italic</i>
"#;

        let output = parse_vtt(vtt);
        assert_eq!(output.cues[0].raw_text, "Hello World");
        assert_eq!(output.cues[1].raw_text, "Bold and italic");
    }

    #[test]
    fn test_parse_vtt_ignores_notes_and_header() {
        let vtt = r#"WEBVTT - lecture

NOTE reviewed by editor

00:00:01.000 --> 00:00:02.000
Only cue
"#;

        let output = parse_vtt(vtt);
        assert_eq!(output.cues.len(), 1);
        assert_eq!(output.cues[0].raw_text, "Only cue");
    }

    #[test]
    fn test_parse_vtt_skips_malformed_timing_and_its_text() {
        let vtt = r#"WEBVTT

01:23.456 --> 02:34.567
Short format is not accepted

00:00:05.000 --> 00:00:06.000
Kept
"#;

        let output = parse_vtt(vtt);
        assert_eq!(output.skipped, 1);
        assert_eq!(output.cues.len(), 1);
        assert_eq!(output.cues[0].raw_text, "Kept");
    }

    #[test]
    fn test_parse_vtt_cue_without_text_is_not_emitted() {
        let vtt = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\n\n00:00:03.000 --> 00:00:04.000\nText";
        let output = parse_vtt(vtt);
        assert_eq!(output.cues.len(), 1);
        assert_eq!(output.cues[0].start_time, 3.0);
    }

    #[test]
    fn test_parse_vtt_without_header_still_parses() {
        let vtt = "00:00:01.000 --> 00:00:04.000\nHello\n";
        let output = parse_vtt(vtt);
        assert_eq!(output.cues.len(), 1);
    }
}
