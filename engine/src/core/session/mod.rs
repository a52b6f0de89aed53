//! Playback Session
//!
//! Binds one transcript to a playback clock. The host media element pushes
//! clock events in (`on_time_update`, `on_seek`, `on_play`, `on_pause`) and
//! drives reveal animation with `tick`; the presentation layer pulls the
//! active utterance and keyword states back out.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::core::{
    ingest::{ingest, IngestSummary},
    lifecycle::{KeywordLifecycleState, LifecycleEngine},
    settings::EngineSettings,
    transcript::{ActiveKeyword, Transcript, Utterance, UtteranceStatus},
    CoreResult, TimeSec, UtteranceId,
};

/// Backward clock movement tolerated as jitter before it counts as a seek
pub const SEEK_EPSILON_SECS: TimeSec = 0.25;

/// A transcript bound to a playback clock
#[derive(Debug)]
pub struct PlaybackSession<R: Rng = StdRng> {
    settings: EngineSettings,
    transcript: Option<Transcript>,
    lifecycle: LifecycleEngine<R>,
    current_time: TimeSec,
    playing: bool,
}

impl PlaybackSession<StdRng> {
    /// Creates a paused session at time 0 with an entropy-seeded cadence
    pub fn new(settings: EngineSettings) -> Self {
        let lifecycle = LifecycleEngine::from_entropy(settings.lifecycle.clone());
        Self::with_lifecycle(settings, lifecycle)
    }

    /// Creates a paused session at time 0 with a reproducible cadence
    pub fn seeded(settings: EngineSettings, seed: u64) -> Self {
        let lifecycle = LifecycleEngine::seeded(settings.lifecycle.clone(), seed);
        Self::with_lifecycle(settings, lifecycle)
    }
}

impl<R: Rng> PlaybackSession<R> {
    /// Creates a paused session around an existing lifecycle engine
    pub fn with_lifecycle(settings: EngineSettings, mut lifecycle: LifecycleEngine<R>) -> Self {
        lifecycle.pause();
        Self {
            settings,
            transcript: None,
            lifecycle,
            current_time: 0.0,
            playing: false,
        }
    }

    // =========================================================================
    // Transcript Management
    // =========================================================================

    /// Replaces the transcript.
    ///
    /// Every keyword instance of the previous transcript is disposed before
    /// the new one becomes queryable.
    pub fn load(&mut self, transcript: Transcript) {
        self.lifecycle.clear();
        info!(
            "Loaded transcript: {} utterances, {:.2}s",
            transcript.len(),
            transcript.duration()
        );
        self.transcript = Some(transcript);

        let visible = self.visible_keywords(self.current_time);
        self.lifecycle.observe(self.current_time, &visible);
    }

    /// Parses and loads raw transcript text.
    ///
    /// On failure the current transcript and keyword states are untouched.
    pub fn ingest(&mut self, raw: &str, format_hint: &str) -> CoreResult<IngestSummary> {
        let (transcript, summary) = ingest(raw, format_hint, &self.settings)?.into_parts();
        self.load(transcript);
        Ok(summary)
    }

    /// The loaded transcript, if any
    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    /// Settings this session was created with
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // =========================================================================
    // Clock Events
    // =========================================================================

    /// Handles a playback position update.
    ///
    /// A backward jump larger than [`SEEK_EPSILON_SECS`] is handled as a seek.
    pub fn on_time_update(&mut self, time_sec: TimeSec) {
        if !time_sec.is_finite() {
            warn!("Ignoring non-finite playback time {}", time_sec);
            return;
        }
        if time_sec < self.current_time - SEEK_EPSILON_SECS {
            debug!(
                "Backward time update {} -> {} treated as seek",
                self.current_time, time_sec
            );
            self.on_seek(time_sec);
            return;
        }

        self.current_time = time_sec;
        let visible = self.visible_keywords(time_sec);
        self.lifecycle.observe(time_sec, &visible);
    }

    /// Handles a seek to an arbitrary position
    pub fn on_seek(&mut self, time_sec: TimeSec) {
        if !time_sec.is_finite() {
            warn!("Ignoring seek to non-finite time {}", time_sec);
            return;
        }
        self.current_time = time_sec;
        let visible = self.visible_keywords(time_sec);
        let report = self.lifecycle.seek(time_sec, &visible);
        debug!(
            "Seek to {}: {} keywords appeared, {} removed",
            time_sec, report.appeared, report.expired
        );
    }

    /// Playback started or resumed
    pub fn on_play(&mut self) {
        self.playing = true;
        self.lifecycle.resume();
    }

    /// Playback paused
    pub fn on_pause(&mut self) {
        self.playing = false;
        self.lifecycle.pause();
    }

    /// Advances keyword reveal animation by `elapsed` wall-clock time
    pub fn tick(&mut self, elapsed: Duration) {
        self.lifecycle.advance(elapsed);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Last observed playback time
    pub fn current_time(&self) -> TimeSec {
        self.current_time
    }

    /// Returns true while playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The utterance being spoken at the current time
    pub fn active_utterance(&self) -> Option<&Utterance> {
        self.transcript.as_ref()?.active_utterance(self.current_time)
    }

    /// Keywords currently on screen, in order of appearance
    pub fn active_keyword_states(&self) -> &[KeywordLifecycleState] {
        self.lifecycle.states()
    }

    /// Status of an utterance relative to the current time
    pub fn utterance_status(&self, id: UtteranceId) -> Option<UtteranceStatus> {
        self.transcript.as_ref()?.status_at(id, self.current_time)
    }

    /// Playback progress through the transcript as a percentage
    pub fn progress(&self) -> f64 {
        self.transcript
            .as_ref()
            .map(|t| t.progress(self.current_time))
            .unwrap_or(0.0)
    }

    fn visible_keywords(&self, time_sec: TimeSec) -> Vec<ActiveKeyword> {
        self.transcript
            .as_ref()
            .map(|t| t.active_keywords(time_sec, self.lifecycle.grace_secs()))
            .unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================
