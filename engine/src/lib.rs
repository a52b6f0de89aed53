//! Keyscribe Core Library
//!
//! Transcript ingestion and time-synchronized keyword presentation.
//! This library contains the format parsers, the canonical transcript model,
//! the time-indexed query engine and the keyword lifecycle engine.
//!
//! The playback surface and all rendering live outside this crate: callers feed
//! raw transcript text in, drive a [`core::session::PlaybackSession`] with clock
//! events, and pull presentation state back out.

pub mod core;

pub use crate::core::{
    ingest::{ingest, IngestOutcome, IngestSummary},
    lifecycle::{KeywordLifecycleState, KeywordPhase, LifecycleEngine},
    session::PlaybackSession,
    settings::EngineSettings,
    transcript::{KeywordSpan, Transcript, Utterance},
    CoreError, CoreResult,
};
