//! Keyscribe Core Type Definitions
//!
//! Defines fundamental types used throughout the project.

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// ID Types
// =============================================================================

/// Utterance identifier (1-based position in the built transcript)
pub type UtteranceId = u32;

/// Keyword lifecycle instance identifier (ULID)
pub type InstanceId = String;

// =============================================================================
// Time Types
// =============================================================================

/// Time in seconds (floating point)
pub type TimeSec = f64;

// =============================================================================
// Time Range
// =============================================================================

/// Inclusive time range
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_sec: TimeSec,
    pub end_sec: TimeSec,
}

impl TimeRange {
    pub fn new(start_sec: TimeSec, end_sec: TimeSec) -> Self {
        if start_sec > end_sec {
            warn!(
                "TimeRange created with start > end ({} > {}), swapping",
                start_sec, end_sec
            );
            return Self {
                start_sec: end_sec,
                end_sec: start_sec,
            };
        }
        Self { start_sec, end_sec }
    }

    /// Checks if a given time is within range (both ends inclusive)
    pub fn contains(&self, time: TimeSec) -> bool {
        time >= self.start_sec && time <= self.end_sec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_swaps_reversed_bounds() {
        let range = TimeRange::new(5.0, 2.0);
        assert_eq!(range.start_sec, 2.0);
        assert_eq!(range.end_sec, 5.0);
    }

    #[test]
    fn test_time_range_contains_is_inclusive() {
        let range = TimeRange::new(2.0, 7.0);
        assert!(range.contains(2.0));
        assert!(range.contains(7.0));
        assert!(!range.contains(7.0001));
        assert!(!range.contains(1.9999));
    }
}
