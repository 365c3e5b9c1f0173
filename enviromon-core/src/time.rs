//! Time handling for the engine
//!
//! The engine never reads a clock itself. The host passes `now` and the local
//! hour of day into every call, which keeps cadence and calibration logic
//! deterministic under test. Hosts that want a single object can implement
//! [`TimeSource`].

use crate::constants::time::{HOURS_PER_DAY, MS_PER_SECOND};

/// Timestamp in milliseconds since epoch (or device boot for monotonic)
pub type Timestamp = u64;

/// Source of time for the monitor loop
pub trait TimeSource {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Local hour of day, `0..24`, used for the daily recalibration
    fn hour_of_day(&self) -> u8;
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
    hour: u8,
}

impl FixedTime {
    /// Fixed clock at `timestamp`, hour 0
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp, hour: 0 }
    }

    /// Set the reported hour of day (wrapped into `0..24`)
    pub fn with_hour(mut self, hour: u8) -> Self {
        self.hour = hour % HOURS_PER_DAY;
        self
    }

    /// Jump to an absolute timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }

    /// Move forward by whole seconds
    pub fn advance_secs(&mut self, secs: u64) {
        self.advance(secs.saturating_mul(MS_PER_SECOND));
    }

    /// Change the reported hour of day (wrapped into `0..24`)
    pub fn set_hour(&mut self, hour: u8) {
        self.hour = hour % HOURS_PER_DAY;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn hour_of_day(&self) -> u8 {
        self.hour
    }
}

/// Milliseconds elapsed from `earlier` to `later`, zero if the clock went back
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}
