//! Keyscribe Core Engine
//!
//! Core transcript engine module.
//! Handles parsing, keyword extraction, time-indexed lookups and keyword lifecycle.

pub mod formats;
pub mod ingest;
pub mod lifecycle;
pub mod sample;
pub mod session;
pub mod settings;
pub mod text;
pub mod timecode;
pub mod transcript;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
