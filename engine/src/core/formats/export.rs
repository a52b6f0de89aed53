//! Transcript exporters.

use std::fmt::Write;

use crate::core::{
    timecode::{format_srt_timestamp, format_vtt_timestamp},
    transcript::{Transcript, Utterance},
    CoreResult,
};

/// Writes one blank-line-separated block per utterance and ends the output
/// with a single newline.
fn write_blocks(
    output: &mut String,
    transcript: &Transcript,
    header: impl Fn(&Utterance) -> Option<String>,
    timestamp: fn(f64) -> String,
) {
    for utterance in transcript.utterances() {
        if let Some(header) = header(utterance) {
            let _ = writeln!(output, "{}", header);
        }
        let _ = writeln!(
            output,
            "{} --> {}",
            timestamp(utterance.start_time),
            timestamp(utterance.end_time)
        );
        let _ = writeln!(output, "{}\n", utterance.text);
    }

    let kept = output.trim_end().len();
    output.truncate(kept);
    if !output.is_empty() {
        output.push('\n');
    }
}

/// Exports a transcript to SRT, numbering cues by utterance id
pub fn export_srt(transcript: &Transcript) -> String {
    let mut output = String::new();
    write_blocks(
        &mut output,
        transcript,
        |u| Some(u.id.to_string()),
        format_srt_timestamp,
    );
    output
}

/// Exports a transcript to WebVTT
pub fn export_vtt(transcript: &Transcript) -> String {
    let mut output = String::from("WEBVTT\n\n");
    write_blocks(&mut output, transcript, |_| None, format_vtt_timestamp);
    output
}

/// Exports a transcript to the structured JSON interchange format
pub fn export_json(transcript: &Transcript) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(transcript.utterances())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formats::{parse_json, parse_srt, parse_vtt, RawCue};
    use crate::core::transcript::TranscriptBuilder;

    fn sample() -> Transcript {
        TranscriptBuilder::new()
            .build(vec![
                RawCue::new(1.0, 4.0, "Hello World"),
                RawCue::new(5.5, 8.0, "Second caption"),
            ])
            .0
    }

    #[test]
    fn test_export_srt() {
        let srt = export_srt(&sample());
        assert!(srt.starts_with("1\n00:00:01,000 --> 00:00:04,000\nHello World"));
        assert!(srt.contains("2\n00:00:05,500 --> 00:00:08,000\nSecond caption"));
    }

    #[test]
    fn test_export_vtt() {
        let vtt = export_vtt(&sample());
        assert!(vtt.starts_with("WEBVTT"));
        assert!(vtt.contains("00:00:01.000 --> 00:00:04.000"));
        assert!(vtt.contains("Hello World"));
    }

    #[test]
    fn test_exported_srt_and_vtt_parse_back() {
        let transcript = sample();

        let from_srt = parse_srt(&export_srt(&transcript));
        assert_eq!(from_srt.cues.len(), 2);
        assert_eq!(from_srt.cues[1].start_time, 5.5);
        assert_eq!(from_srt.cues[1].raw_text, "Second caption");

        let from_vtt = parse_vtt(&export_vtt(&transcript));
        assert_eq!(from_vtt.cues.len(), 2);
        assert_eq!(from_vtt.cues[0].raw_text, "Hello World");
    }

    #[test]
    fn test_export_json_keeps_keyword_timing() {
        let json = export_json(&sample()).unwrap();
        let parsed = parse_json(&json).unwrap();

        assert_eq!(parsed.cues.len(), 2);
        let keywords = parsed.cues[0].keywords.as_ref().unwrap();
        let words: Vec<_> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["hello", "world"]);
        assert_eq!(keywords[0].start, 1.0);
        assert_eq!(keywords[0].end, 4.0);
    }

    #[test]
    fn test_export_empty_transcript() {
        let empty = Transcript::empty();
        assert_eq!(export_srt(&empty), "");
        assert_eq!(export_vtt(&empty), "WEBVTT\n");
        assert_eq!(export_json(&empty).unwrap(), "[]");
    }
}
