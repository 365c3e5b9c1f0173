//! Engine configuration
//!
//! Everything a deployment can tune lives in [`EngineConfig`]. Defaults come
//! from the documented [`constants`](crate::constants) modules. Hosts usually
//! decode it from their own configuration file (see the connectors crate)
//! and call [`EngineConfig::validate`] before starting the engine.

use crate::aqi::AqiThresholds;
use crate::constants::gas::DEFAULT_CALIBRATION_HOUR;
use crate::constants::time::{
    BAROMETER_INTERVAL_MS, GAS_WARMUP_MS, HOURS_PER_DAY, LONG_CADENCE_MS, SHORT_CADENCE_MS,
    STARTUP_STABILISATION_MS,
};
use crate::errors::{EngineError, EngineResult};
use crate::gas::CalibrationSchedule;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cadences of the cooperative cycle loop (ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Cadences {
    /// Climate + gas reads
    pub short_ms: u64,
    /// Telemetry + snapshot
    pub long_ms: u64,
    /// Barometer history insertion
    pub barometer_ms: u64,
    /// Settling time before the first telemetry
    pub stabilisation_ms: u64,
}

impl Default for Cadences {
    fn default() -> Self {
        Self {
            short_ms: SHORT_CADENCE_MS,
            long_ms: LONG_CADENCE_MS,
            barometer_ms: BAROMETER_INTERVAL_MS,
            stabilisation_ms: STARTUP_STABILISATION_MS,
        }
    }
}

/// Deployment configuration of the engine
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Station altitude above sea level (m)
    pub altitude_m: f64,
    /// User correction added to compensated temperature (°C)
    pub temp_offset_c: f64,
    /// Weather-protection cover fitted (selects the coefficient set)
    pub weather_cover: bool,
    /// Gas heater warm-up duration (ms)
    pub warmup_ms: u64,
    /// Local hour of the daily gas recalibration
    pub calibration_hour: u8,
    /// Air-quality threshold ladders
    pub thresholds: AqiThresholds,
    /// Loop cadences
    pub cadences: Cadences,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            altitude_m: 0.0,
            temp_offset_c: 0.0,
            weather_cover: false,
            warmup_ms: GAS_WARMUP_MS,
            calibration_hour: DEFAULT_CALIBRATION_HOUR,
            thresholds: AqiThresholds::default(),
            cadences: Cadences::default(),
        }
    }
}

impl EngineConfig {
    /// Set station altitude
    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = altitude_m;
        self
    }

    /// Set the user temperature offset
    pub fn with_temp_offset(mut self, temp_offset_c: f64) -> Self {
        self.temp_offset_c = temp_offset_c;
        self
    }

    /// Select the covered or uncovered coefficient set
    pub fn with_weather_cover(mut self, weather_cover: bool) -> Self {
        self.weather_cover = weather_cover;
        self
    }

    /// Set the gas warm-up duration
    pub fn with_warmup_ms(mut self, warmup_ms: u64) -> Self {
        self.warmup_ms = warmup_ms;
        self
    }

    /// Set the daily calibration hour
    pub fn with_calibration_hour(mut self, hour: u8) -> Self {
        self.calibration_hour = hour;
        self
    }

    /// Replace the threshold ladders
    pub fn with_thresholds(mut self, thresholds: AqiThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replace the loop cadences
    pub fn with_cadences(mut self, cadences: Cadences) -> Self {
        self.cadences = cadences;
        self
    }

    /// Gas calibration schedule derived from this configuration
    pub fn schedule(&self) -> CalibrationSchedule {
        CalibrationSchedule {
            warmup_ms: self.warmup_ms,
            calibration_hour: self.calibration_hour,
        }
    }

    /// Check the configuration before starting the engine
    pub fn validate(&self) -> EngineResult<()> {
        if !self.altitude_m.is_finite() {
            return Err(EngineError::InvalidConfig { reason: "altitude must be finite" });
        }
        if !self.temp_offset_c.is_finite() {
            return Err(EngineError::InvalidConfig { reason: "temperature offset must be finite" });
        }
        if self.calibration_hour >= HOURS_PER_DAY {
            return Err(EngineError::InvalidConfig { reason: "calibration hour must be below 24" });
        }
        let c = &self.cadences;
        if c.short_ms == 0 || c.long_ms == 0 || c.barometer_ms == 0 {
            return Err(EngineError::InvalidConfig { reason: "cadences must be non-zero" });
        }
        self.thresholds.validate()
    }
}
