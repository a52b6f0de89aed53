//! Simulated playback
//!
//! Drives a [`PlaybackSession`] from a tokio interval the way a media element
//! would: each tick advances the playback clock by the elapsed wall-clock time
//! times the playback speed. Keyword reveal animation always advances by the
//! unscaled wall-clock time, whatever the speed.

use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use keyscribe_lib::core::lifecycle::KeywordLifecycleState;
use keyscribe_lib::core::timecode::format_clock;
use keyscribe_lib::core::UtteranceId;
use keyscribe_lib::PlaybackSession;

use crate::error::CliError;

/// Fastest accepted playback speed multiplier
pub const MAX_SPEED: f64 = 1000.0;

/// Playback range and pacing
#[derive(Clone, Debug)]
pub struct PlayOptions {
    from: f64,
    until: Option<f64>,
    speed: f64,
    tick: Duration,
}

impl PlayOptions {
    pub fn new(from: f64, until: Option<f64>, speed: f64, tick: Duration) -> Result<Self, CliError> {
        if !from.is_finite() || from < 0.0 {
            return Err(CliError::InvalidTime(from));
        }
        if let Some(until) = until {
            if !until.is_finite() {
                return Err(CliError::InvalidTime(until));
            }
            if until < from {
                return Err(CliError::InvalidRange { from, until });
            }
        }
        if !speed.is_finite() || speed <= 0.0 || speed > MAX_SPEED {
            return Err(CliError::InvalidSpeed(speed));
        }
        if tick.is_zero() {
            return Err(CliError::InvalidTick);
        }

        Ok(Self {
            from,
            until,
            speed,
            tick,
        })
    }
}

/// What a playback run showed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaySummary {
    pub utterances_shown: usize,
    pub keywords_shown: usize,
    pub interrupted: bool,
}

/// Plays the session's transcript from `options.from` until the end of the
/// range, printing each utterance and keyword board change to stdout.
///
/// Stops early on Ctrl-C.
pub async fn run(session: &mut PlaybackSession, options: &PlayOptions) -> Result<PlaySummary> {
    let end = match options.until {
        Some(until) => until,
        None => session.transcript().map(|t| t.duration()).unwrap_or(0.0),
    };
    info!(
        "Playing {} -> {} at {}x",
        format_clock(options.from),
        format_clock(end),
        options.speed
    );

    let mut summary = PlaySummary::default();
    let mut last_utterance: Option<UtteranceId> = None;
    let mut last_board = String::new();
    let mut seen_instances: Vec<String> = Vec::new();

    session.on_seek(options.from);
    session.on_play();

    let mut tick = interval(options.tick);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tick.tick().await;
    let mut last_tick = Instant::now();
    let mut clock = options.from;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = &mut ctrl_c => {
                debug!("Playback interrupted");
                summary.interrupted = true;
                break;
            }
        }

        let now = Instant::now();
        let wall = now.duration_since(last_tick);
        last_tick = now;

        clock = (clock + wall.as_secs_f64() * options.speed).min(end);
        session.on_time_update(clock);
        session.tick(wall);

        let current = session.active_utterance().map(|u| u.id);
        if current != last_utterance {
            if let Some(utterance) = session.active_utterance() {
                println!("[{}] {}", format_clock(utterance.start_time), utterance.text);
                summary.utterances_shown += 1;
            }
            last_utterance = current;
        }

        let states = session.active_keyword_states();
        for state in states {
            if !seen_instances.contains(&state.instance_id) {
                seen_instances.push(state.instance_id.clone());
                summary.keywords_shown += 1;
            }
        }

        let board = render_board(states);
        if board != last_board {
            if !board.is_empty() {
                println!("    {}", board);
            }
            last_board = board;
        }

        if clock >= end {
            break;
        }
    }

    session.on_pause();
    info!(
        "Stopped at {} ({:.0}%)",
        format_clock(session.current_time()),
        session.progress()
    );

    Ok(summary)
}

/// Renders the keyword board as one line
///
/// Revealing keywords end with `_`; emphasis is shown with `*` markers.
fn render_board(states: &[KeywordLifecycleState]) -> String {
    states
        .iter()
        .map(|state| {
            let marks = "*".repeat(state.emphasis as usize);
            let cursor = if state.is_revealing() {
                "_"
            } else {
                ""
            };
            format!("{}{}{}{}", marks, state.display_text(), cursor, marks)
        })
        .collect::<Vec<_>>()
        .join("  ")
}
