//! Persistent engine state
//!
//! ## What Is Persisted
//!
//! A monitor restarts for many reasons: updates, watchdog reboots, power
//! blips. Losing three hours of pressure history or a week of gas baseline on
//! every restart would make forecasts and gas readings useless for hours, so
//! all long-lived mutable state is gathered in one [`EngineState`] and written
//! out periodically as a [`Snapshot`].
//!
//! ## Acceptance Contract
//!
//! A snapshot is only trusted if it is recent. Cadences and the forecast
//! horizon assume continuity, and a device that was off for an hour has a
//! pressure history with a hole in it.
//!
//! ```text
//! age = start_time - snapshot.updated_at
//! age <  20 min  → restore
//! age >= 20 min  → EngineError::SnapshotExpired, caller uses defaults
//! ```
//!
//! Storage is not the engine's business; see
//! [`SnapshotStore`](crate::traits::SnapshotStore).

use crate::barometer::BarometerHistory;
use crate::constants::time::{INITIAL_FORECAST_DELAY_MS, SNAPSHOT_MAX_AGE_MS};
use crate::errors::{EngineError, EngineResult};
use crate::forecast::ForecastResult;
use crate::gas::{CalibrationSchedule, GasCalibrationManager};
use crate::time::{elapsed_ms, Timestamp};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot layout version; bump when fields change meaning
pub const SNAPSHOT_FORMAT: u16 = 1;

/// Every piece of long-lived mutable state of the engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineState {
    /// Gas baselines, warm-up state and daily windows
    pub gas: GasCalibrationManager,
    /// Pressure history
    pub barometer: BarometerHistory,
    /// Time of the last barometer insertion, `None` before the first
    pub barometer_logged_at: Option<Timestamp>,
    /// Latest forecast
    pub forecast: ForecastResult,
    /// Highest temperature seen
    pub max_temp: Option<f64>,
    /// Lowest temperature seen
    pub min_temp: Option<f64>,
    /// Display mode index
    pub display_mode: u8,
    /// Time of the last display page change
    pub last_page_at: Timestamp,
}

impl EngineState {
    /// Fresh state for a process started at `start_time`
    pub fn new(gas: GasCalibrationManager, start_time: Timestamp) -> Self {
        Self {
            gas,
            barometer: BarometerHistory::new(),
            barometer_logged_at: None,
            forecast: ForecastResult::insufficient(start_time.saturating_add(INITIAL_FORECAST_DELAY_MS)),
            max_temp: None,
            min_temp: None,
            display_mode: 0,
            last_page_at: start_time,
        }
    }

    /// Fold a temperature into the cumulative max/min
    pub fn record_temperature(&mut self, temperature_c: f64) {
        if temperature_c.is_nan() {
            return;
        }
        self.max_temp = Some(self.max_temp.map_or(temperature_c, |m| m.max(temperature_c)));
        self.min_temp = Some(self.min_temp.map_or(temperature_c, |m| m.min(temperature_c)));
    }

    /// Capture the state for persistence at `now`
    pub fn snapshot(&self, now: Timestamp) -> Snapshot {
        Snapshot {
            format: SNAPSHOT_FORMAT,
            updated_at: now,
            state: self.clone(),
        }
    }

    /// State from a snapshot, if it is young enough at `start_time`
    ///
    /// The gas schedule is not persisted and is re-applied from the current
    /// configuration.
    pub fn restore(snapshot: Snapshot, start_time: Timestamp, schedule: CalibrationSchedule) -> EngineResult<Self> {
        snapshot.check(start_time)?;
        let mut state = snapshot.state;
        state.gas = state.gas.with_schedule(schedule);
        Ok(state)
    }
}

/// Timestamped copy of [`EngineState`] for storage
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// Layout version
    pub format: u16,
    /// When the snapshot was taken
    pub updated_at: Timestamp,
    /// Captured state
    pub state: EngineState,
}

impl Snapshot {
    /// Age of the snapshot at `now`
    pub fn age_ms(&self, now: Timestamp) -> u64 {
        elapsed_ms(self.updated_at, now)
    }

    /// Validate the snapshot for a restore at `start_time`
    pub fn check(&self, start_time: Timestamp) -> EngineResult<()> {
        if self.format != SNAPSHOT_FORMAT {
            return Err(EngineError::SnapshotInvalid { reason: "unknown snapshot format" });
        }
        let age_ms = self.age_ms(start_time);
        if age_ms >= SNAPSHOT_MAX_AGE_MS {
            return Err(EngineError::SnapshotExpired { age_ms, max_age_ms: SNAPSHOT_MAX_AGE_MS });
        }
        let gas = &self.state.gas;
        if gas.is_warm() && gas.history().red_r0.is_empty() {
            return Err(EngineError::SnapshotInvalid { reason: "warm gas baseline without history" });
        }
        let b = gas.baseline();
        if ![b.red_r0, b.oxi_r0, b.nh3_r0].iter().all(|r| r.is_finite()) {
            return Err(EngineError::SnapshotInvalid { reason: "non-finite gas baseline" });
        }
        Ok(())
    }
}
