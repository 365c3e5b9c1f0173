//! Error Types for the Compensation Engine
//!
//! ## Design Philosophy
//!
//! Errors are returned from the cycle loop of a device that may be running
//! without an allocator, so they follow the same rules as the rest of the core:
//!
//! 1. **No Heap Allocation**: messages are `&'static str`, never `String`.
//! 2. **Copy Semantics**: errors are `Copy` and can be stored or re-raised
//!    without moving anything.
//! 3. **Actionable Information**: each variant names the collaborator or
//!    setting that caused it.
//!
//! ## What Is *Not* An Error
//!
//! Several conditions look like failures but are part of normal operation and
//! never surface here:
//!
//! - A gas ratio `Rs/R0 <= 0` is floored to `0.0001` before the logarithm.
//! - A stale external feed silently falls back to the local sensor.
//! - A corrupt, missing or old snapshot falls back to defaults.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use enviromon_core::{EngineError, SensorError};
//!
//! fn handle(err: EngineError) {
//!     match err {
//!         EngineError::SensorRead { sensor, cause: SensorError::Timeout } => {
//!             // Sensor stopped answering even after a reset
//!             // schedule_reboot(sensor);
//!             let _ = sensor;
//!         }
//!         EngineError::InvalidConfig { reason } => {
//!             // Refuse to start with a broken configuration
//!             let _ = reason;
//!         }
//!         _ => {}
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Failure reported by a sensor collaborator for a single read attempt
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Device did not answer in time
    #[error("sensor read timed out")]
    Timeout,

    /// Frame arrived but failed its checksum
    #[error("sensor frame checksum mismatch")]
    ChecksumMismatch,

    /// Bus-level failure (NACK, arbitration loss)
    #[error("sensor bus error")]
    Bus,
}

/// Engine errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// A sensor failed twice in a row, once before and once after a reset
    #[error("{sensor} sensor read failed after reset: {cause}")]
    SensorRead {
        /// Which collaborator failed ("climate", "gas", "particulate")
        sensor: &'static str,
        /// Failure reported on the retry
        cause: SensorError,
    },

    /// Configuration rejected by [`EngineConfig::validate`](crate::EngineConfig::validate)
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Offending setting
        reason: &'static str,
    },

    /// Snapshot is older than the acceptance window
    #[error("snapshot is {age_ms} ms old, limit is {max_age_ms} ms")]
    SnapshotExpired {
        /// Age of the snapshot at restore time
        age_ms: u64,
        /// Maximum accepted age
        max_age_ms: u64,
    },

    /// Snapshot content is internally inconsistent
    #[error("snapshot rejected: {reason}")]
    SnapshotInvalid {
        /// Failed consistency check
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Timeout => defmt::write!(fmt, "Timeout"),
            Self::ChecksumMismatch => defmt::write!(fmt, "ChecksumMismatch"),
            Self::Bus => defmt::write!(fmt, "Bus"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EngineError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::SensorRead { sensor, cause } =>
                defmt::write!(fmt, "{} sensor failed: {}", sensor, cause),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
            Self::SnapshotExpired { age_ms, max_age_ms } =>
                defmt::write!(fmt, "Snapshot {} ms old (max {})", age_ms, max_age_ms),
            Self::SnapshotInvalid { reason } =>
                defmt::write!(fmt, "Snapshot rejected: {}", reason),
        }
    }
}
