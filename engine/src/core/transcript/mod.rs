//! Transcript Data Models
//!
//! The canonical, validated form every source format is normalized into.
//!
//! # Overview
//!
//! - [`KeywordSpan`]: a keyword with its own visibility timing
//! - [`Utterance`]: one validated timed text unit with a stable 1-based id
//! - [`Transcript`]: utterances ordered by start time, plus a small lookup
//!   index so time queries stay logarithmic
//!
//! A transcript is immutable once built. Loading a new source produces a new
//! transcript that replaces the old one wholesale.

mod builder;
mod query;

pub use builder::{BuildReport, TranscriptBuilder};
pub use query::{ActiveKeyword, KEYWORD_GRACE_SECS};

use serde::{Deserialize, Serialize};

use crate::core::{TimeSec, UtteranceId};

// =============================================================================
// Keyword Span
// =============================================================================

/// A keyword together with the interval during which it is spoken
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordSpan {
    /// Keyword text
    pub word: String,
    /// Start time in seconds
    pub start: TimeSec,
    /// End time in seconds
    pub end: TimeSec,
}

impl KeywordSpan {
    pub fn new(word: &str, start: TimeSec, end: TimeSec) -> Self {
        Self {
            word: word.to_string(),
            start,
            end,
        }
    }

    /// Creates a span with unknown timing, defaulted to the owning utterance's bounds
    pub fn spanning(word: &str, utterance_start: TimeSec, utterance_end: TimeSec) -> Self {
        Self::new(word, utterance_start, utterance_end)
    }
}

// =============================================================================
// Utterance
// =============================================================================

/// A single validated utterance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    /// Sequential identifier (1-based, transcript order)
    pub id: UtteranceId,
    /// Start time in seconds
    pub start_time: TimeSec,
    /// End time in seconds
    pub end_time: TimeSec,
    /// Markup-stripped text
    pub text: String,
    /// Keywords in source order
    #[serde(default)]
    pub keywords: Vec<KeywordSpan>,
}

impl Utterance {
    /// Returns the duration of this utterance in seconds
    pub fn duration(&self) -> TimeSec {
        self.end_time - self.start_time
    }

    /// Returns true if the utterance is being spoken at `time_sec` (inclusive bounds)
    pub fn is_active_at(&self, time_sec: TimeSec) -> bool {
        time_sec >= self.start_time && time_sec <= self.end_time
    }
}

/// Where an utterance sits relative to the playback position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtteranceStatus {
    /// Not yet reached
    Upcoming,
    /// The active utterance
    Active,
    /// Already finished
    Past,
}

// =============================================================================
// Transcript
// =============================================================================

/// Ordered, validated sequence of utterances
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    utterances: Vec<Utterance>,
    index: query::QueryIndex,
}

impl Transcript {
    /// Creates an empty transcript (a valid state: every query returns nothing)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a transcript from utterances already validated and sorted by start time
    pub(crate) fn from_sorted(utterances: Vec<Utterance>) -> Self {
        let index = query::QueryIndex::build(&utterances);
        Self { utterances, index }
    }

    /// Returns all utterances in transcript order
    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    /// Returns the number of utterances
    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    /// Returns true if the transcript has no utterances
    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// Looks up an utterance by id
    pub fn get(&self, id: UtteranceId) -> Option<&Utterance> {
        // Ids are positions, so this is a direct index.
        let position = (id as usize).checked_sub(1)?;
        self.utterances.get(position).filter(|u| u.id == id)
    }

    /// Returns the time at which the last utterance ends (0 when empty)
    pub fn duration(&self) -> TimeSec {
        self.utterances
            .iter()
            .map(|u| u.end_time)
            .fold(0.0, f64::max)
    }

    /// Returns playback progress through the transcript as a percentage
    pub fn progress(&self, time_sec: TimeSec) -> f64 {
        let duration = self.duration();
        if duration <= 0.0 || !time_sec.is_finite() {
            return 0.0;
        }
        (time_sec / duration * 100.0).clamp(0.0, 100.0)
    }

    /// Returns the full text of the transcript
    pub fn full_text(&self) -> String {
        self.utterances
            .iter()
            .map(|u| u.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns the status of an utterance at the given time
    pub fn status_at(&self, id: UtteranceId, time_sec: TimeSec) -> Option<UtteranceStatus> {
        let utterance = self.get(id)?;
        let status = if self.active_utterance(time_sec).map(|u| u.id) == Some(id) {
            UtteranceStatus::Active
        } else if time_sec > utterance.end_time {
            UtteranceStatus::Past
        } else {
            UtteranceStatus::Upcoming
        };
        Some(status)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance(id: UtteranceId, start: f64, end: f64, text: &str) -> Utterance {
        Utterance {
            id,
            start_time: start,
            end_time: end,
            text: text.to_string(),
            keywords: Vec::new(),
        }
    }

    fn sample() -> Transcript {
        Transcript::from_sorted(vec![
            utterance(1, 0.0, 2.0, "First"),
            utterance(2, 3.0, 5.0, "Second"),
            utterance(3, 5.0, 8.5, "Third"),
        ])
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::empty();
        assert!(transcript.is_empty());
        assert_eq!(transcript.duration(), 0.0);
        assert_eq!(transcript.progress(3.0), 0.0);
        assert!(transcript.active_utterance(0.0).is_none());
        assert_eq!(transcript.full_text(), "");
    }

    #[test]
    fn test_get_by_id() {
        let transcript = sample();
        assert_eq!(transcript.get(2).unwrap().text, "Second");
        assert!(transcript.get(0).is_none());
        assert!(transcript.get(4).is_none());
    }

    #[test]
    fn test_duration_and_progress() {
        let transcript = sample();
        assert_eq!(transcript.duration(), 8.5);
        assert_eq!(transcript.progress(0.0), 0.0);
        assert!((transcript.progress(4.25) - 50.0).abs() < 1e-9);
        assert_eq!(transcript.progress(100.0), 100.0);
        assert_eq!(transcript.progress(-1.0), 0.0);
    }

    #[test]
    fn test_full_text() {
        assert_eq!(sample().full_text(), "First Second Third");
    }

    #[test]
    fn test_status_at() {
        let transcript = sample();
        assert_eq!(transcript.status_at(1, 1.0), Some(UtteranceStatus::Active));
        assert_eq!(transcript.status_at(2, 1.0), Some(UtteranceStatus::Upcoming));
        assert_eq!(transcript.status_at(1, 2.5), Some(UtteranceStatus::Past));
        assert_eq!(transcript.status_at(9, 2.5), None);
    }

    #[test]
    fn test_status_at_shared_boundary_prefers_earlier_utterance() {
        let transcript = sample();
        // 5.0 is both the end of #2 and the start of #3; first match wins.
        assert_eq!(transcript.status_at(2, 5.0), Some(UtteranceStatus::Active));
        assert_eq!(transcript.status_at(3, 5.0), Some(UtteranceStatus::Upcoming));
    }

    #[test]
    fn test_utterance_serializes_camel_case() {
        let json = serde_json::to_value(utterance(1, 1.0, 3.5, "Hello world")).unwrap();
        assert_eq!(json["startTime"], 1.0);
        assert_eq!(json["endTime"], 3.5);
        assert_eq!(json["text"], "Hello world");
    }
}
