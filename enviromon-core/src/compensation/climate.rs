//! Polynomial Temperature and Humidity Correction
//!
//! ## Why Correct At All?
//!
//! The combined climate sensor is mounted a few millimetres from the CPU and
//! the display backlight. Its temperature reads several degrees high and its
//! relative humidity correspondingly low. The error is not a constant offset:
//! it grows with ambient temperature because the board dissipates more heat
//! into warmer, less dense air.
//!
//! ## Fitted Model
//!
//! Both corrections were least-squares fitted against a reference station:
//!
//! ```text
//! T = a·raw³ + b·raw² + c·raw + d
//! H = min(100, p·raw² + q·raw + r)
//! ```
//!
//! Two coefficient sets exist because fitting the weather-protection cover
//! (and turning the display off) changes the thermal path completely. The
//! set is chosen once at start-up from configuration. The user temperature
//! offset is folded into `d`.
//!
//! Humidity is clamped from above only. At extreme raw inputs the quadratic
//! can go negative; that value is passed through so the anomaly is visible
//! downstream rather than silently hidden.

use crate::constants::climate::{
    HUMIDITY_CEILING_PCT, HUMIDITY_DRY_MAX_PCT, HUMIDITY_WET_MIN_PCT,
    HUM_QUADRATIC_COVERED, HUM_QUADRATIC_UNCOVERED, TEMP_CUBIC_COVERED,
    TEMP_CUBIC_UNCOVERED,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coefficients for one mounting configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientSet {
    /// Cubic temperature coefficients `(a, b, c, d)`
    pub temperature: [f64; 4],
    /// Quadratic humidity coefficients `(p, q, r)`
    pub humidity: [f64; 3],
}

impl CoefficientSet {
    /// Display enabled, no weather cover
    pub const UNCOVERED: CoefficientSet = CoefficientSet {
        temperature: TEMP_CUBIC_UNCOVERED,
        humidity: HUM_QUADRATIC_UNCOVERED,
    };

    /// Weather-protection cover fitted
    pub const COVERED: CoefficientSet = CoefficientSet {
        temperature: TEMP_CUBIC_COVERED,
        humidity: HUM_QUADRATIC_COVERED,
    };

    /// Set matching the weather-cover flag
    pub const fn for_cover(weather_cover: bool) -> Self {
        if weather_cover {
            Self::COVERED
        } else {
            Self::UNCOVERED
        }
    }
}

/// Maps raw temperature/humidity to corrected values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateCompensator {
    coefficients: CoefficientSet,
    temp_offset_c: f64,
}

impl ClimateCompensator {
    /// Compensator for the given mounting and user temperature offset
    pub const fn new(weather_cover: bool, temp_offset_c: f64) -> Self {
        Self {
            coefficients: CoefficientSet::for_cover(weather_cover),
            temp_offset_c,
        }
    }

    /// Compensator with explicit coefficients (used when refitting)
    pub const fn with_coefficients(coefficients: CoefficientSet, temp_offset_c: f64) -> Self {
        Self { coefficients, temp_offset_c }
    }

    /// Active coefficient set
    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }

    /// Corrected temperature in °C
    ///
    /// Evaluated term by term in a fixed order, so repeated calls with the
    /// same input give bit-identical results.
    pub fn correct_temperature(&self, raw_c: f64) -> f64 {
        let [a, b, c, d] = self.coefficients.temperature;
        a * libm::pow(raw_c, 3.0) + b * libm::pow(raw_c, 2.0) + c * raw_c + (d + self.temp_offset_c)
    }

    /// Corrected relative humidity in %, never above 100
    pub fn correct_humidity(&self, raw_pct: f64) -> f64 {
        let [p, q, r] = self.coefficients.humidity;
        let corrected = p * libm::pow(raw_pct, 2.0) + q * raw_pct + r;
        // NaN from a NaN input stays NaN; min() would hide it as 100
        if corrected > HUMIDITY_CEILING_PCT {
            HUMIDITY_CEILING_PCT
        } else {
            corrected
        }
    }
}

/// Coarse humidity comfort band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HumidityDescription {
    /// At or below 30 %
    Dry,
    /// Between 30 % and 70 %
    Good,
    /// At or above 70 %
    Wet,
}

impl HumidityDescription {
    /// Band for a corrected humidity value
    pub fn from_humidity(humidity_pct: f64) -> Self {
        if humidity_pct > HUMIDITY_DRY_MAX_PCT && humidity_pct < HUMIDITY_WET_MIN_PCT {
            Self::Good
        } else if humidity_pct >= HUMIDITY_WET_MIN_PCT {
            Self::Wet
        } else {
            // Includes NaN
            Self::Dry
        }
    }

    /// Home-automation humidity status code
    pub fn home_automation_code(self) -> &'static str {
        match self {
            Self::Good => "1",
            Self::Dry => "2",
            Self::Wet => "3",
        }
    }

    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dry => "dry",
            Self::Good => "good",
            Self::Wet => "wet",
        }
    }
}
