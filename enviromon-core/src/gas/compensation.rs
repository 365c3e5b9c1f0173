//! Gas Drift Compensation and Concentration Curves
//!
//! ## Drift Model
//!
//! A metal-oxide sensing layer is a heated semiconductor, so its resistance
//! depends on ambient temperature, humidity and pressure as well as on gas.
//! Relative to the reference point stored in [`GasBaseline`], each channel
//! is corrected with a linear model:
//!
//! ```text
//! Rs_comp = round(Rs_raw - (k_t·(T - T_ref) + k_h·(H - H_ref) + k_b·(P - P_ref)))
//! ```
//!
//! `T`, `H` and `P` are the *raw* sensor readings, not the compensated
//! climate, because the coefficients were fitted against raw values.
//!
//! ## Concentration Curves
//!
//! The datasheet sensitivity plots are straight lines on log-log axes:
//!
//! ```text
//! ppm = 10 ^ (m · log10(Rs/R0) + c)
//!
//! Channel     m       c
//! reducing  -1.25    0.64
//! oxidising  1.0    -0.8129
//! ammonia   -1.8    -0.163
//! ```
//!
//! A ratio that is zero, negative or NaN (compensation overshoot, dead
//! channel) is floored to `0.0001` so the logarithm stays defined. That
//! yields a large but finite ppm value rather than a panic.

use crate::constants::gas::{
    MIN_RESISTANCE_RATIO, NH3_CURVE, NH3_DRIFT, OXI_CURVE, OXI_DRIFT, RED_CURVE, RED_DRIFT,
};
use crate::gas::GasBaseline;
use crate::sensors::{GasRawTriplet, RawClimateSample};
use crate::utils::round_whole;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sensing channel of the gas sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GasChannel {
    /// Reducing gases (CO, ethanol, ...)
    Reducing,
    /// Oxidising gases (NO2, ...)
    Oxidising,
    /// Ammonia
    Ammonia,
}

impl GasChannel {
    /// All channels in telemetry order
    pub const ALL: [GasChannel; 3] = [GasChannel::Reducing, GasChannel::Oxidising, GasChannel::Ammonia];

    /// Drift coefficients `(k_t, k_h, k_b)`
    pub const fn drift(self) -> [f64; 3] {
        match self {
            Self::Reducing => RED_DRIFT,
            Self::Oxidising => OXI_DRIFT,
            Self::Ammonia => NH3_DRIFT,
        }
    }

    /// Curve `(slope, intercept)` in log10 space
    pub const fn curve(self) -> (f64, f64) {
        match self {
            Self::Reducing => RED_CURVE,
            Self::Oxidising => OXI_CURVE,
            Self::Ammonia => NH3_CURVE,
        }
    }

    fn pick(self, triplet: &GasRawTriplet) -> f64 {
        match self {
            Self::Reducing => triplet.reducing,
            Self::Oxidising => triplet.oxidising,
            Self::Ammonia => triplet.nh3,
        }
    }
}

/// Stateless drift compensation and ppm conversion
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GasCompensationEngine;

impl GasCompensationEngine {
    /// New engine (no configuration, the coefficients are fixed)
    pub const fn new() -> Self {
        Self
    }

    /// Drift-compensated resistance of one channel, rounded to whole ohms
    pub fn compensate(
        &self,
        channel: GasChannel,
        raw_rs: f64,
        reference: &GasBaseline,
        env: &RawClimateSample,
    ) -> f64 {
        let [k_t, k_h, k_b] = channel.drift();
        let dt = env.temperature_c - reference.calib_temp;
        let dh = env.humidity_pct - reference.calib_hum;
        let db = env.pressure_hpa - reference.calib_bar;
        round_whole(raw_rs - (k_t * dt + k_h * dh + k_b * db))
    }

    /// Compensate all three channels
    pub fn compensate_triplet(
        &self,
        raw: &GasRawTriplet,
        reference: &GasBaseline,
        env: &RawClimateSample,
    ) -> GasRawTriplet {
        GasRawTriplet {
            reducing: self.compensate(GasChannel::Reducing, raw.reducing, reference, env),
            oxidising: self.compensate(GasChannel::Oxidising, raw.oxidising, reference, env),
            nh3: self.compensate(GasChannel::Ammonia, raw.nh3, reference, env),
        }
    }

    /// Concentration in ppm for a compensated resistance and its R0
    pub fn resistance_to_ppm(&self, channel: GasChannel, comp_rs: f64, r0: f64) -> f64 {
        let mut ratio = comp_rs / r0;
        if ratio.is_nan() || ratio <= 0.0 {
            ratio = MIN_RESISTANCE_RATIO;
        }
        let (slope, intercept) = channel.curve();
        libm::pow(10.0, slope * libm::log10(ratio) + intercept)
    }

    /// Concentrations of all three channels, in channel order
    pub fn concentrations(&self, compensated: &GasRawTriplet, baseline: &GasBaseline) -> [f64; 3] {
        GasChannel::ALL.map(|ch| self.resistance_to_ppm(ch, ch.pick(compensated), baseline.r0(ch)))
    }
}
