//! Metal-oxide gas sensing
//!
//! The gas sensor exposes three sensing resistances (reducing, oxidising,
//! ammonia). Turning them into concentrations takes two cooperating parts:
//!
//! - [`GasCompensationEngine`]: removes temperature/humidity/pressure drift
//!   and maps `Rs/R0` to ppm through fitted power-law curves
//! - [`GasCalibrationManager`]: owns the clean-air baselines (`R0`) and the
//!   Cold → Warm → daily-recalibration life cycle
//!
//! ```text
//!            raw Rs ──► compensate ──► Rs/R0 ──► curve ──► ppm
//!                          ▲             ▲
//!   reference T/H/P ───────┘     R0 ─────┘   (both from GasBaseline)
//! ```

pub mod calibration;
pub mod compensation;

pub use calibration::{CalibrationHistory, CalibrationSchedule, GasCalibrationManager, GasCalibrationState};
pub use compensation::{GasChannel, GasCompensationEngine};

use crate::sensors::GasRawTriplet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Clean-air resistances and the climate they were captured in
///
/// Mutated only by [`GasCalibrationManager`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasBaseline {
    /// Reducing channel R0 (Ω)
    pub red_r0: f64,
    /// Oxidising channel R0 (Ω)
    pub oxi_r0: f64,
    /// Ammonia channel R0 (Ω)
    pub nh3_r0: f64,
    /// Raw temperature at calibration (°C)
    pub calib_temp: f64,
    /// Raw humidity at calibration (%)
    pub calib_hum: f64,
    /// Pressure at calibration (hPa)
    pub calib_bar: f64,
}

impl GasBaseline {
    /// R0 of one channel
    pub fn r0(&self, channel: GasChannel) -> f64 {
        match channel {
            GasChannel::Reducing => self.red_r0,
            GasChannel::Oxidising => self.oxi_r0,
            GasChannel::Ammonia => self.nh3_r0,
        }
    }

    /// R0 values as a triplet
    pub fn r0_triplet(&self) -> GasRawTriplet {
        GasRawTriplet {
            reducing: self.red_r0,
            oxidising: self.oxi_r0,
            nh3: self.nh3_r0,
        }
    }
}

/// Gas concentrations for one short cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasConcentrations {
    /// Reducing gases (ppm)
    pub red_ppm: f64,
    /// Oxidising gases (ppm)
    pub oxi_ppm: f64,
    /// Ammonia (ppm)
    pub nh3_ppm: f64,
    /// Resistances as read
    pub raw: GasRawTriplet,
    /// Resistances after drift compensation (equal to `raw` while Cold)
    pub compensated: GasRawTriplet,
    /// True once the warm-up baseline exists
    pub calibrated: bool,
}
