//! Climate and barometric compensation
//!
//! Two pure stages sit between the raw climate sensor and everything else:
//!
//! - [`ClimateCompensator`] removes the self-heating bias of an on-board
//!   temperature/humidity sensor with fitted polynomials
//! - [`BarometricAltitudeCompensator`] converts station pressure to the
//!   sea-level equivalent used by forecasts and displays
//!
//! Their combined, presentation-ready output is a [`CompensatedClimate`].

pub mod barometric;
pub mod climate;

pub use barometric::BarometricAltitudeCompensator;
pub use climate::{ClimateCompensator, CoefficientSet, HumidityDescription};

use crate::arbiter::Source;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Corrected climate values for one short cycle
///
/// Humidity is never above 100 %. It may be negative for pathological raw
/// inputs, which is passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompensatedClimate {
    /// Temperature in °C (0.1 resolution when local)
    pub temperature_c: f64,
    /// Relative humidity in % (0.1 resolution when local)
    pub humidity_pct: f64,
    /// Sea-level equivalent pressure in hPa, rounded to 0.1
    pub pressure_hpa: f64,
    /// Where temperature and humidity came from
    pub temp_humidity_source: Source,
    /// Where pressure came from
    pub barometer_source: Source,
    /// Station pressure in Pa with altitude compensation removed
    ///
    /// Third-party citizen-science endpoints apply their own compensation.
    pub upstream_pressure_pa: f64,
}

impl CompensatedClimate {
    /// Dry / good / wet description of the humidity
    pub fn humidity_description(&self) -> HumidityDescription {
        HumidityDescription::from_humidity(self.humidity_pct)
    }
}
