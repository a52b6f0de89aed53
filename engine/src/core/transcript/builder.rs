//! Transcript Model Builder
//!
//! Turns raw parser cues into a validated [`Transcript`]: drops malformed
//! cues, orders by start time, assigns sequential ids and attaches keywords.
//! Building never fails; an input with no usable cues yields an empty
//! transcript.

use tracing::{debug, warn};

use super::{KeywordSpan, Transcript, Utterance};
use crate::core::{
    formats::RawCue, settings::KeywordSettings, text::KeywordExtractor, TimeSec, UtteranceId,
};

/// Counts of cues discarded during building
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Cues dropped because `end <= start` or a time was not finite
    pub invalid_timing: usize,
    /// Cues dropped because their text was empty after trimming
    pub empty_text: usize,
}

impl BuildReport {
    /// Total cues dropped
    pub fn dropped(&self) -> usize {
        self.invalid_timing + self.empty_text
    }
}

/// Builds canonical transcripts from raw cues
#[derive(Clone, Debug, Default)]
pub struct TranscriptBuilder {
    extractor: KeywordExtractor,
}

impl TranscriptBuilder {
    /// Creates a builder with default keyword extraction
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder using the given keyword settings
    pub fn with_keyword_settings(settings: &KeywordSettings) -> Self {
        Self {
            extractor: KeywordExtractor::from_settings(settings),
        }
    }

    /// Builds a transcript from cues (possibly concatenated from several parser passes)
    pub fn build(&self, cues: Vec<RawCue>) -> (Transcript, BuildReport) {
        let mut report = BuildReport::default();
        let mut surviving = Vec::with_capacity(cues.len());

        for cue in cues {
            if !cue.start_time.is_finite()
                || !cue.end_time.is_finite()
                || cue.end_time <= cue.start_time
            {
                debug!(
                    "Dropping cue with invalid timing {}~{}",
                    cue.start_time, cue.end_time
                );
                report.invalid_timing += 1;
                continue;
            }

            let text = cue.raw_text.trim();
            if text.is_empty() {
                debug!("Dropping empty cue at {}", cue.start_time);
                report.empty_text += 1;
                continue;
            }

            let text = text.to_string();
            surviving.push((cue.start_time, cue.end_time, text, cue.keywords));
        }

        // Stable: cues sharing a start time keep their source order.
        surviving.sort_by(|a, b| a.0.total_cmp(&b.0));

        let utterances = surviving
            .into_iter()
            .enumerate()
            .map(|(position, (start_time, end_time, text, keywords))| {
                let keywords = match keywords {
                    Some(spans) => spans
                        .into_iter()
                        .map(|span| validate_span(span, start_time, end_time))
                        .collect(),
                    None => self
                        .extractor
                        .extract(&text)
                        .iter()
                        .map(|word| KeywordSpan::spanning(word, start_time, end_time))
                        .collect(),
                };

                Utterance {
                    id: (position + 1) as UtteranceId,
                    start_time,
                    end_time,
                    text,
                    keywords,
                }
            })
            .collect();

        (Transcript::from_sorted(utterances), report)
    }
}

/// Repairs explicit keyword timing: non-finite bounds fall back to the
/// utterance's, and a reversed span collapses onto its start.
fn validate_span(mut span: KeywordSpan, start_time: TimeSec, end_time: TimeSec) -> KeywordSpan {
    if !span.start.is_finite() {
        span.start = start_time;
    }
    if !span.end.is_finite() {
        span.end = end_time;
    }
    if span.start > span.end {
        warn!(
            "Keyword '{}' has start > end ({} > {}), clamping",
            span.word, span.start, span.end
        );
        span.end = span.start;
    }
    span
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(start: f64, end: f64, text: &str) -> RawCue {
        RawCue::new(start, end, text)
    }

    #[test]
    fn test_build_assigns_sequential_ids_after_filtering() {
        let builder = TranscriptBuilder::new();
        let (transcript, report) = builder.build(vec![
            cue(0.0, 1.0, "First line"),
            cue(2.0, 2.0, "Zero length"),
            cue(3.0, 1.0, "Reversed"),
            cue(4.0, 5.0, "   "),
            cue(6.0, 7.0, "Last line"),
        ]);

        let ids: Vec<_> = transcript.utterances().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(transcript.utterances()[1].text, "Last line");
        assert_eq!(report.invalid_timing, 2);
        assert_eq!(report.empty_text, 1);
        assert_eq!(report.dropped(), 3);
    }

    #[test]
    fn test_build_sorts_by_start_time_stably() {
        let builder = TranscriptBuilder::new();
        let (transcript, _) = builder.build(vec![
            cue(5.0, 6.0, "Later"),
            cue(1.0, 2.0, "Early A"),
            cue(1.0, 3.0, "Early B"),
        ]);

        let texts: Vec<_> = transcript.utterances().iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Early A", "Early B", "Later"]);
        assert_eq!(transcript.utterances()[2].id, 3);
    }

    #[test]
    fn test_build_empty_input() {
        let (transcript, report) = TranscriptBuilder::new().build(Vec::new());
        assert!(transcript.is_empty());
        assert_eq!(report.dropped(), 0);
    }

    #[test]
    fn test_build_rejects_non_finite_times() {
        let (transcript, report) = TranscriptBuilder::new().build(vec![
            cue(f64::NAN, 1.0, "nan"),
            cue(0.0, f64::INFINITY, "inf"),
        ]);
        assert!(transcript.is_empty());
        assert_eq!(report.invalid_timing, 2);
    }

    #[test]
    fn test_build_extracts_keywords_with_utterance_bounds() {
        let (transcript, _) = TranscriptBuilder::new()
            .build(vec![cue(2.0, 4.0, "The quick brown fox jumps over the lazy dog.")]);

        let keywords = &transcript.utterances()[0].keywords;
        let words: Vec<_> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["quick", "brown", "jumps", "over", "lazy"]);
        assert!(keywords.iter().all(|k| k.start == 2.0 && k.end == 4.0));
    }

    #[test]
    fn test_build_keeps_explicit_keywords() {
        let explicit = cue(0.0, 8.0, "Autonomous vehicles")
            .with_keywords(vec![KeywordSpan::new("autonomous vehicles", 4.5, 8.0)]);
        let (transcript, _) = TranscriptBuilder::new().build(vec![explicit]);

        let keywords = &transcript.utterances()[0].keywords;
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].word, "autonomous vehicles");
        assert_eq!(keywords[0].start, 4.5);
    }

    #[test]
    fn test_build_repairs_reversed_keyword_span() {
        let explicit =
            cue(0.0, 8.0, "Text").with_keywords(vec![KeywordSpan::new("word", 6.0, 2.0)]);
        let (transcript, _) = TranscriptBuilder::new().build(vec![explicit]);

        let span = &transcript.utterances()[0].keywords[0];
        assert_eq!(span.start, 6.0);
        assert_eq!(span.end, 6.0);
    }

    #[test]
    fn test_build_trims_text() {
        let (transcript, _) = TranscriptBuilder::new().build(vec![cue(0.0, 1.0, "  padded  ")]);
        assert_eq!(transcript.utterances()[0].text, "padded");
    }
}
