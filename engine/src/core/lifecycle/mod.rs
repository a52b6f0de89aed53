//! Keyword Lifecycle Engine
//!
//! Tracks every keyword currently on screen through
//! `Pending → Revealing → Held → Expired`.
//!
//! # Driving the engine
//!
//! Two independent inputs move instances along:
//!
//! - **Playback time** ([`LifecycleEngine::observe`], [`LifecycleEngine::seek`])
//!   decides which keywords exist. A keyword appears the moment its visibility
//!   window `[start, end + grace]` contains the playback time and expires as
//!   soon as the time leaves that window, including small backward moves
//!   before its start.
//! - **Wall-clock time** ([`LifecycleEngine::advance`]) reveals characters,
//!   one or two per step every 50–80 ms. Stepping is suspended while paused
//!   and resumes from the exact character count and remaining step delay.
//!
//! The engine is advanced through `&mut self` by a single owner, so each
//! instance has exactly one ticker. Randomness comes from an injected
//! [`Rng`]; use [`LifecycleEngine::seeded`] for reproducible cadences.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, trace};

use crate::core::{
    settings::LifecycleSettings, transcript::ActiveKeyword, InstanceId, TimeRange, TimeSec,
    UtteranceId,
};

// =============================================================================
// Lifecycle State
// =============================================================================

/// Phase of a keyword instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordPhase {
    /// Observed visible, not yet revealing
    Pending,
    /// Characters are being revealed
    Revealing,
    /// Fully revealed and still visible
    Held,
    /// Visibility window closed; removed on the next sweep
    Expired,
}

/// Presentation state of one on-screen keyword
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordLifecycleState {
    /// Unique instance identifier (ULID)
    pub instance_id: InstanceId,
    /// Keyword text
    pub keyword: String,
    /// Utterance the keyword belongs to
    pub utterance_id: UtteranceId,
    /// Keyword start time (playback clock)
    pub appeared_at: TimeSec,
    /// Keyword end time (playback clock), before the grace tail
    pub end_time: TimeSec,
    /// Number of characters revealed so far
    pub revealed_chars: usize,
    /// Current phase
    pub phase: KeywordPhase,
    /// Presentation emphasis tier (0-2), drawn once per instance
    pub emphasis: u8,
    /// Wall-clock time left until the next reveal step
    #[serde(skip)]
    next_step_in: Duration,
}

impl KeywordLifecycleState {
    /// Keyword length in characters
    pub fn char_len(&self) -> usize {
        self.keyword.chars().count()
    }

    /// The revealed prefix of the keyword
    pub fn display_text(&self) -> &str {
        match self.keyword.char_indices().nth(self.revealed_chars) {
            Some((byte_idx, _)) => &self.keyword[..byte_idx],
            None => &self.keyword,
        }
    }

    /// Returns true while characters are still being revealed
    pub fn is_revealing(&self) -> bool {
        self.phase == KeywordPhase::Revealing
    }

    /// The inclusive playback window during which this instance is visible
    pub fn visibility_window(&self, grace_secs: TimeSec) -> TimeRange {
        TimeRange::new(self.appeared_at, self.end_time + grace_secs)
    }

    fn matches(&self, word: &str, appeared_at: TimeSec) -> bool {
        self.keyword == word && self.appeared_at == appeared_at
    }
}

// =============================================================================
// Lifecycle Engine
// =============================================================================

/// Changes produced by one [`LifecycleEngine::observe`] call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObserveReport {
    /// New instances created
    pub appeared: usize,
    /// Instances expired and swept
    pub expired: usize,
}

/// Owns every live keyword instance and advances them
#[derive(Debug)]
pub struct LifecycleEngine<R: Rng = StdRng> {
    settings: LifecycleSettings,
    instances: Vec<KeywordLifecycleState>,
    rng: R,
    paused: bool,
}

impl LifecycleEngine<StdRng> {
    /// Creates an engine with a reproducible random cadence
    pub fn seeded(settings: LifecycleSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    /// Creates an engine seeded from OS entropy
    pub fn from_entropy(settings: LifecycleSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }
}

impl<R: Rng> LifecycleEngine<R> {
    /// Creates an engine using the given random source
    pub fn with_rng(settings: LifecycleSettings, rng: R) -> Self {
        let mut settings = settings;
        settings.step_max_ms = settings.step_max_ms.max(settings.step_min_ms);
        settings.double_step_chance = if settings.double_step_chance.is_finite() {
            settings.double_step_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            settings,
            instances: Vec::new(),
            rng,
            paused: false,
        }
    }

    /// Grace tail applied after each keyword's end time
    pub fn grace_secs(&self) -> TimeSec {
        self.settings.grace_secs
    }

    /// Live instances in order of appearance
    pub fn states(&self) -> &[KeywordLifecycleState] {
        &self.instances
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if no keyword is on screen
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Suspends reveal stepping
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes reveal stepping where it left off
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Disposes every instance (transcript replaced)
    pub fn clear(&mut self) {
        if !self.instances.is_empty() {
            debug!("Clearing {} keyword instances", self.instances.len());
        }
        self.instances.clear();
    }

    /// Applies a playback time update.
    ///
    /// `visible` is the set of keywords whose visibility window contains
    /// `time_sec` (see [`crate::core::transcript::Transcript::active_keywords`]).
    pub fn observe(&mut self, time_sec: TimeSec, visible: &[ActiveKeyword]) -> ObserveReport {
        let mut report = ObserveReport::default();

        for active in visible {
            let span = &active.span;
            if self
                .instances
                .iter()
                .any(|k| k.matches(&span.word, span.start))
            {
                continue;
            }

            let mut state = KeywordLifecycleState {
                instance_id: ulid::Ulid::new().to_string(),
                keyword: span.word.clone(),
                utterance_id: active.utterance_id,
                appeared_at: span.start,
                end_time: span.end,
                revealed_chars: 0,
                phase: KeywordPhase::Pending,
                emphasis: self.rng.gen_range(0..=2),
                next_step_in: Duration::ZERO,
            };
            begin_reveal(&mut state, &self.settings, &mut self.rng);
            trace!("Keyword '{}' appeared at {}", state.keyword, time_sec);

            self.instances.push(state);
            report.appeared += 1;
        }

        let grace = self.settings.grace_secs;
        for state in self.instances.iter_mut() {
            if time_sec > state.end_time + grace || time_sec < state.appeared_at {
                state.phase = KeywordPhase::Expired;
            }
        }
        report.expired = self.sweep();

        report
    }

    /// Applies a non-monotonic jump: instances whose window does not contain
    /// the new time are dropped, then the new time is observed.
    pub fn seek(&mut self, time_sec: TimeSec, visible: &[ActiveKeyword]) -> ObserveReport {
        let grace = self.settings.grace_secs;
        let before = self.instances.len();
        self.instances.retain(|k| {
            k.phase != KeywordPhase::Expired && k.visibility_window(grace).contains(time_sec)
        });
        let dropped = before - self.instances.len();

        let mut report = self.observe(time_sec, visible);
        report.expired += dropped;
        report
    }

    /// Removes expired instances, returning how many were removed
    pub fn sweep(&mut self) -> usize {
        let before = self.instances.len();
        self.instances.retain(|k| k.phase != KeywordPhase::Expired);
        before - self.instances.len()
    }

    /// Advances reveal stepping by `elapsed` wall-clock time.
    ///
    /// No-op while paused. Several steps may fire for one instance if
    /// `elapsed` spans several step delays.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.paused {
            return;
        }

        for state in self.instances.iter_mut() {
            if state.phase != KeywordPhase::Revealing {
                continue;
            }

            let mut remaining = elapsed;
            while remaining >= state.next_step_in {
                remaining -= state.next_step_in;
                reveal_step(state, &self.settings, &mut self.rng);
                if state.phase != KeywordPhase::Revealing {
                    break;
                }
                state.next_step_in = draw_step_delay(&self.settings, &mut self.rng);
            }
            if state.phase == KeywordPhase::Revealing {
                state.next_step_in -= remaining;
            }
        }
    }
}

fn draw_step_delay<R: Rng>(settings: &LifecycleSettings, rng: &mut R) -> Duration {
    Duration::from_millis(rng.gen_range(settings.step_min_ms..=settings.step_max_ms))
}

fn begin_reveal<R: Rng>(state: &mut KeywordLifecycleState, settings: &LifecycleSettings, rng: &mut R) {
    if state.char_len() == 0 {
        state.phase = KeywordPhase::Held;
        return;
    }
    state.phase = KeywordPhase::Revealing;
    state.next_step_in = draw_step_delay(settings, rng);
}

fn reveal_step<R: Rng>(state: &mut KeywordLifecycleState, settings: &LifecycleSettings, rng: &mut R) {
    let chars_to_add = if rng.gen_bool(settings.double_step_chance) {
        2
    } else {
        1
    };
    let len = state.char_len();
    state.revealed_chars = (state.revealed_chars + chars_to_add).min(len);
    if state.revealed_chars == len {
        state.phase = KeywordPhase::Held;
    }
}

// =============================================================================
// Tests
// =============================================================================
