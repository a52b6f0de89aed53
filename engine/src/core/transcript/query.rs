//! Time-Indexed Query Engine
//!
//! Answers "which utterance is active at `t`" and "which keywords are visible
//! at `t`" without any cursor state, so callers may query in any order (seeks,
//! scrubbing, concurrent observers).
//!
//! Both lookups binary search the start times for the last candidate, then
//! binary search a running maximum of end times for the first candidate whose
//! window can still reach `t`. Only that narrow slice is scanned.

use serde::Serialize;

use super::{KeywordSpan, Transcript, Utterance};
use crate::core::{TimeSec, UtteranceId};

/// Seconds a keyword stays visible after its own end time
pub const KEYWORD_GRACE_SECS: TimeSec = 2.0;

/// A keyword visible at a query time, tagged with its owning utterance
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveKeyword {
    /// Owning utterance
    pub utterance_id: UtteranceId,
    /// The keyword span
    pub span: KeywordSpan,
}

/// Position of a keyword inside the transcript
#[derive(Clone, Copy, Debug, PartialEq)]
struct KeywordRef {
    utterance: usize,
    keyword: usize,
    start: TimeSec,
    end: TimeSec,
}

/// Lookup tables derived from a transcript at build time
#[derive(Clone, Debug, Default, PartialEq)]
pub(super) struct QueryIndex {
    /// Running maximum of utterance end times, in transcript order
    max_end: Vec<TimeSec>,
    /// Every keyword, stable-sorted by start time
    keywords: Vec<KeywordRef>,
    /// Running maximum of keyword end times, in `keywords` order
    keyword_max_end: Vec<TimeSec>,
}

impl QueryIndex {
    pub(super) fn build(utterances: &[Utterance]) -> Self {
        let max_end = running_max(utterances.iter().map(|u| u.end_time));

        let mut keywords: Vec<KeywordRef> = utterances
            .iter()
            .enumerate()
            .flat_map(|(u_idx, u)| {
                u.keywords.iter().enumerate().map(move |(k_idx, k)| KeywordRef {
                    utterance: u_idx,
                    keyword: k_idx,
                    start: k.start,
                    end: k.end,
                })
            })
            .collect();
        keywords.sort_by(|a, b| a.start.total_cmp(&b.start));
        let keyword_max_end = running_max(keywords.iter().map(|k| k.end));

        Self {
            max_end,
            keywords,
            keyword_max_end,
        }
    }
}

fn running_max(values: impl Iterator<Item = TimeSec>) -> Vec<TimeSec> {
    let mut current = f64::NEG_INFINITY;
    values
        .map(|v| {
            current = current.max(v);
            current
        })
        .collect()
}

impl Transcript {
    /// Returns the first utterance (lowest start time) whose inclusive window
    /// contains `time_sec`, or `None`.
    ///
    /// Overlapping utterances resolve to the earliest one in transcript order.
    pub fn active_utterance(&self, time_sec: TimeSec) -> Option<&Utterance> {
        let upper = self
            .utterances
            .partition_point(|u| u.start_time <= time_sec);
        let lower = self.index.max_end[..upper].partition_point(|&end| end < time_sec);

        self.utterances[lower..upper]
            .iter()
            .find(|u| u.is_active_at(time_sec))
    }

    /// Returns every keyword whose `[start, end + grace]` window contains
    /// `time_sec`, in transcript order.
    ///
    /// Keywords outlive their utterance by `grace_secs`, so this can include
    /// keywords of an utterance that is no longer active.
    pub fn active_keywords(&self, time_sec: TimeSec, grace_secs: TimeSec) -> Vec<ActiveKeyword> {
        let refs = &self.index.keywords;
        let upper = refs.partition_point(|k| k.start <= time_sec);
        let lower = self.index.keyword_max_end[..upper]
            .partition_point(|&end| end + grace_secs < time_sec);

        let mut hits: Vec<KeywordRef> = refs[lower..upper]
            .iter()
            .filter(|k| time_sec <= k.end + grace_secs)
            .copied()
            .collect();
        hits.sort_by_key(|k| (k.utterance, k.keyword));

        hits.into_iter()
            .map(|k| {
                let utterance = &self.utterances[k.utterance];
                ActiveKeyword {
                    utterance_id: utterance.id,
                    span: utterance.keywords[k.keyword].clone(),
                }
            })
            .collect()
    }
}
