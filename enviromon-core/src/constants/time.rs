//! Time-Related Constants
//!
//! All engine timestamps are milliseconds ([`Timestamp`](crate::time::Timestamp)).
//! Durations below are expressed in the same unit.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per hour.
pub const SECONDS_PER_HOUR: u64 = 3600;

/// Hours per day.
pub const HOURS_PER_DAY: u8 = 24;

// ===== CADENCES =====

/// Interval between climate + gas reads (150 s).
pub const SHORT_CADENCE_MS: u64 = 150 * MS_PER_SECOND;

/// Interval between telemetry/persistence updates (300 s).
pub const LONG_CADENCE_MS: u64 = 300 * MS_PER_SECOND;

/// Interval between barometer history insertions (20 min).
///
/// Nine slots at this cadence span "now" back to 160 minutes ago, and the
/// value pushed out of the last slot is the reading from three hours ago.
pub const BAROMETER_INTERVAL_MS: u64 = 1200 * MS_PER_SECOND;

/// Time after the first barometer insertion until a forecast exists (3 h).
pub const FORECAST_LEAD_MS: u64 = 3 * SECONDS_PER_HOUR * MS_PER_SECOND;

/// Default forecast availability before any insertion, relative to start.
///
/// Three hours plus the time taken by the first climate cycle.
pub const INITIAL_FORECAST_DELAY_MS: u64 = 10_945 * MS_PER_SECOND;

/// Settling time after start before telemetry and snapshots are produced.
pub const STARTUP_STABILISATION_MS: u64 = 300 * MS_PER_SECOND;

// ===== WINDOWS =====

/// Gas sensor heater warm-up before the first real calibration (6000 s).
pub const GAS_WARMUP_MS: u64 = 6000 * MS_PER_SECOND;

/// An external reading older than this is ignored (500 s).
pub const EXTERNAL_FEED_STALENESS_MS: u64 = 500 * MS_PER_SECOND;

/// A persisted snapshot older than this at start-up is discarded (20 min).
pub const SNAPSHOT_MAX_AGE_MS: u64 = 1200 * MS_PER_SECOND;

/// A remote station record older than this is no longer displayed.
pub const REMOTE_STATION_STALENESS_MS: u64 = 2 * LONG_CADENCE_MS;
