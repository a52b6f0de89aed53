//! SRT (SubRip) parser.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{parse_timing_line, ParseOutput, RawCue};
use crate::core::{
    text::{collapse_whitespace, strip_angle_markup},
    timecode::parse_srt_timestamp,
};

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid block separator"));

/// Parses SRT (SubRip) content into raw cues
///
/// # SRT Format
///
/// ```text
/// 1
/// 00:00:01,000 --> 00:00:04,000
/// First caption text
///
/// 2
/// 00:00:05,500 --> 00:00:08,000
/// Second caption text
/// with multiple lines
/// ```
///
/// Blocks are separated by one or more blank lines. The second line of each
/// block must be the timing line; blocks where it is missing or malformed are
/// skipped. Text lines are joined with spaces and stripped of `<...>` tags.
pub fn parse_srt(content: &str) -> ParseOutput {
    let normalized = content.replace("\r\n", "\n");
    let mut output = ParseOutput::default();

    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return output;
    }

    for block in BLANK_LINES.split(trimmed) {
        let lines: Vec<&str> = block.trim().lines().collect();

        let timing = lines
            .get(1)
            .ok_or_else(|| "missing timing line".to_string())
            .and_then(|line| {
                parse_timing_line(line.trim(), parse_srt_timestamp).map_err(|e| e.to_string())
            });

        let (start_time, end_time) = match timing {
            Ok(timing) => timing,
            Err(reason) => {
                debug!("Skipping SRT block {:?}: {}", lines.first(), reason);
                output.skipped += 1;
                continue;
            }
        };

        let text = lines
            .iter()
            .skip(2)
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join(" ");
        let text = collapse_whitespace(&strip_angle_markup(&text));

        output.cues.push(RawCue::new(start_time, end_time, &text));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_srt_basic() {
        let srt = "1\n00:00:01,000 --> 00:00:03,500\nHello world\n\n2\n00:00:04,000 --> 00:00:05,000\nBye\n";

        let output = parse_srt(srt);
        assert_eq!(output.skipped, 0);
        assert_eq!(output.cues.len(), 2);

        assert_eq!(output.cues[0].start_time, 1.0);
        assert_eq!(output.cues[0].end_time, 3.5);
        assert_eq!(output.cues[0].raw_text, "Hello world");

        assert_eq!(output.cues[1].start_time, 4.0);
        assert_eq!(output.cues[1].end_time, 5.0);
        assert_eq!(output.cues[1].raw_text, "Bye");
    }

    #[test]
    fn test_parse_srt_multiline_joined_with_spaces() {
        let srt = r#"1
00:00:00,000 --> 00:00:05,000
Line one
Line two
Line three
"#;

        let output = parse_srt(srt);
        assert_eq!(output.cues.len(), 1);
        assert_eq!(output.cues[0].raw_text, "Line one Line two Line three");
    }

    #[test]
    fn test_parse_srt_strips_tags() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000\n<i>Hello</i> <font color=\"red\">there</font>\n";
        let output = parse_srt(srt);
        assert_eq!(output.cues[0].raw_text, "Hello there");
    }

    #[test]
    fn test_parse_srt_skips_malformed_blocks() {
        let srt = r#"1
00:00:invalid --> 00:00:04,000
Hello

2
00:00:05,000 --> 00:00:06,000
Kept

just some stray text
"#;

        let output = parse_srt(srt);
        assert_eq!(output.cues.len(), 1);
        assert_eq!(output.cues[0].raw_text, "Kept");
        assert_eq!(output.skipped, 2);
    }

    #[test]
    fn test_parse_srt_multiple_blank_lines_and_crlf() {
        let srt = "1\r\n00:00:01,000 --> 00:00:02,000\r\nA\r\n\r\n  \r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nB\r\n";
        let output = parse_srt(srt);
        assert_eq!(output.cues.len(), 2);
        assert_eq!(output.cues[1].raw_text, "B");
        assert_eq!(output.skipped, 0);
    }

    #[test]
    fn test_parse_srt_requires_index_line() {
        // Timing on the first line means the second line is text, not timing.
        let srt = "00:00:01,000 --> 00:00:02,000\nNo index\n";
        let output = parse_srt(srt);
        assert!(output.cues.is_empty());
        assert_eq!(output.skipped, 1);
    }

    #[test]
    fn test_parse_srt_empty_input() {
        let output = parse_srt("   \n\n ");
        assert!(output.cues.is_empty());
        assert_eq!(output.skipped, 0);
    }
}
