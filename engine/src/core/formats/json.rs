//! Structured JSON parser.
//!
//! ```json
//! [
//!   {
//!     "startTime": 0,
//!     "endTime": 8.68,
//!     "text": "In our last video...",
//!     "keywords": [{ "word": "autonomous vehicles", "start": 4.5, "end": 8.68 }]
//!   },
//!   { "startTime": 8.68, "endTime": 14.28, "text": "...", "keywords": ["healthcare"] }
//! ]
//! ```
//!
//! Keywords may be plain strings or `{word, start, end}` objects; both are
//! normalized to [`KeywordSpan`]. Strings (and objects missing a bound) take
//! the owning utterance's full `[startTime, endTime]`, not a zero-length span
//! at `startTime`, so they stay visible while the utterance is spoken.
//! An `id` field, if present, is ignored.

use serde::Deserialize;
use tracing::warn;

use super::{ParseOutput, RawCue};
use crate::core::{transcript::KeywordSpan, CoreError, CoreResult, TimeSec};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonUtterance {
    start_time: TimeSec,
    end_time: TimeSec,
    text: String,
    #[serde(default)]
    keywords: Option<Vec<JsonKeyword>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonKeyword {
    Word(String),
    Span {
        word: String,
        #[serde(default)]
        start: Option<TimeSec>,
        #[serde(default)]
        end: Option<TimeSec>,
    },
}

impl JsonKeyword {
    fn into_span(self, start_time: TimeSec, end_time: TimeSec) -> KeywordSpan {
        match self {
            Self::Word(word) => KeywordSpan::spanning(&word, start_time, end_time),
            Self::Span { word, start, end } => KeywordSpan::new(
                &word,
                start.unwrap_or(start_time),
                end.unwrap_or(end_time),
            ),
        }
    }
}

/// Parses the structured JSON transcript format
///
/// Invalid JSON or a top level that is not an array fails with
/// `MalformedContent`. Individual entries that do not match the utterance
/// shape are skipped.
pub fn parse_json(content: &str) -> CoreResult<ParseOutput> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| CoreError::MalformedContent(format!("Invalid JSON: {}", e)))?;

    let serde_json::Value::Array(entries) = value else {
        return Err(CoreError::MalformedContent(
            "Expected a JSON array of utterances".to_string(),
        ));
    };

    let mut output = ParseOutput::default();

    for (position, entry) in entries.into_iter().enumerate() {
        let utterance: JsonUtterance = match serde_json::from_value(entry) {
            Ok(utterance) => utterance,
            Err(e) => {
                warn!("Skipping JSON entry {}: {}", position, e);
                output.skipped += 1;
                continue;
            }
        };

        let mut cue = RawCue::new(utterance.start_time, utterance.end_time, &utterance.text);
        if let Some(keywords) = utterance.keywords {
            let spans = keywords
                .into_iter()
                .map(|k| k.into_span(utterance.start_time, utterance.end_time))
                .collect();
            cue = cue.with_keywords(spans);
        }
        output.cues.push(cue);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_with_keyword_objects() {
        let json = r#"[
            {"id": 7, "startTime": 0, "endTime": 8.68, "text": "Autonomous vehicles",
             "keywords": [{"word": "autonomous vehicles", "start": 4.5, "end": 8.68}]}
        ]"#;

        let output = parse_json(json).unwrap();
        assert_eq!(output.cues.len(), 1);
        let cue = &output.cues[0];
        assert_eq!(cue.end_time, 8.68);
        assert_eq!(
            cue.keywords.as_ref().unwrap()[0],
            KeywordSpan::new("autonomous vehicles", 4.5, 8.68)
        );
    }

    #[test]
    fn test_parse_json_with_plain_string_keywords() {
        let json = r#"[{"startTime": 2, "endTime": 6, "text": "AI in healthcare",
                        "keywords": ["AI", "healthcare"]}]"#;

        let output = parse_json(json).unwrap();
        let keywords = output.cues[0].keywords.as_ref().unwrap();
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[1], KeywordSpan::new("healthcare", 2.0, 6.0));
    }

    #[test]
    fn test_parse_json_keyword_object_missing_bounds() {
        let json = r#"[{"startTime": 2, "endTime": 6, "text": "t",
                        "keywords": [{"word": "partial", "start": 3}]}]"#;

        let output = parse_json(json).unwrap();
        let span = &output.cues[0].keywords.as_ref().unwrap()[0];
        assert_eq!(span.start, 3.0);
        assert_eq!(span.end, 6.0);
    }

    #[test]
    fn test_parse_json_without_keywords_leaves_extraction_to_builder() {
        let json = r#"[{"startTime": 0, "endTime": 1, "text": "Plain entry"}]"#;
        let output = parse_json(json).unwrap();
        assert!(output.cues[0].keywords.is_none());
    }

    #[test]
    fn test_parse_json_skips_malformed_entries() {
        let json = r#"[
            {"startTime": "zero", "endTime": 1, "text": "bad time"},
            {"startTime": 0, "endTime": 1},
            {"startTime": 0, "endTime": 1, "text": "good"}
        ]"#;

        let output = parse_json(json).unwrap();
        assert_eq!(output.skipped, 2);
        assert_eq!(output.cues.len(), 1);
        assert_eq!(output.cues[0].raw_text, "good");
    }

    #[test]
    fn test_parse_json_invalid_syntax_is_fatal() {
        let result = parse_json("[{\"startTime\": 0,");
        assert!(matches!(result, Err(CoreError::MalformedContent(_))));
    }

    #[test]
    fn test_parse_json_non_array_is_fatal() {
        let result = parse_json(r#"{"startTime": 0, "endTime": 1, "text": "x"}"#);
        assert!(matches!(result, Err(CoreError::MalformedContent(_))));
    }

    #[test]
    fn test_parse_json_empty_array() {
        let output = parse_json("[]").unwrap();
        assert!(output.cues.is_empty());
    }
}
