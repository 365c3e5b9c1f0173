//! Sensor samples and collaborator traits
//!
//! Bus access and device drivers live outside the engine. The engine sees
//! sensors only through these traits and receives plain sample values.
//!
//! Gas and particulate reads can fail transiently (timeouts, corrupted
//! frames). [`read_with_retry`] implements the recovery policy used by the
//! engine: reset the device, try exactly once more, then give up with
//! [`EngineError::SensorRead`]. There is no zero-fill fallback.

use crate::errors::{EngineError, EngineResult, SensorError};
use crate::utils::round_whole;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw reading of the combined climate sensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawClimateSample {
    /// Temperature in °C, biased by board heat
    pub temperature_c: f64,
    /// Relative humidity in %
    pub humidity_pct: f64,
    /// Station pressure in hPa
    pub pressure_hpa: f64,
}

impl RawClimateSample {
    /// Sample from the three raw values
    pub const fn new(temperature_c: f64, humidity_pct: f64, pressure_hpa: f64) -> Self {
        Self { temperature_c, humidity_pct, pressure_hpa }
    }
}

/// Sensing resistances of the three gas channels, whole ohms
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasRawTriplet {
    /// Reducing channel (Ω)
    pub reducing: f64,
    /// Oxidising channel (Ω)
    pub oxidising: f64,
    /// Ammonia channel (Ω)
    pub nh3: f64,
}

impl GasRawTriplet {
    /// Triplet rounded to whole ohms
    pub fn new(reducing: f64, oxidising: f64, nh3: f64) -> Self {
        Self {
            reducing: round_whole(reducing),
            oxidising: round_whole(oxidising),
            nh3: round_whole(nh3),
        }
    }
}

/// Particulate mass concentrations
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParticulateSample {
    /// PM1.0 (µg/m³)
    pub pm1: f64,
    /// PM2.5 (µg/m³)
    pub pm2_5: f64,
    /// PM10 (µg/m³)
    pub pm10: f64,
}

impl ParticulateSample {
    /// Sample from the three mass concentrations
    pub const fn new(pm1: f64, pm2_5: f64, pm10: f64) -> Self {
        Self { pm1, pm2_5, pm10 }
    }
}

/// Combined temperature/humidity/pressure sensor
pub trait ClimateSensor {
    /// Read one raw sample
    fn read_raw_climate(&mut self) -> Result<RawClimateSample, SensorError>;
}

/// Three-channel metal-oxide gas sensor
pub trait GasSensor {
    /// Read the three sensing resistances
    fn read_raw_gas(&mut self) -> Result<GasRawTriplet, SensorError>;

    /// Reset the device after a failed read
    fn reset(&mut self);
}

/// Optical particulate counter
pub trait ParticulateSensor {
    /// Read mass concentrations
    fn read_particulates(&mut self) -> Result<ParticulateSample, SensorError>;

    /// Reset the device after a failed read
    fn reset(&mut self);
}

/// Sensor set handed to the engine on every tick
pub struct Sensors<'a> {
    /// Climate sensor
    pub climate: &'a mut dyn ClimateSensor,
    /// Gas sensor
    pub gas: &'a mut dyn GasSensor,
    /// Particulate sensor, absent on units without one
    pub particulates: Option<&'a mut dyn ParticulateSensor>,
}

impl<'a> Sensors<'a> {
    /// Sensor set without a particulate counter
    pub fn new(climate: &'a mut dyn ClimateSensor, gas: &'a mut dyn GasSensor) -> Self {
        Self { climate, gas, particulates: None }
    }

    /// Attach a particulate counter
    pub fn with_particulates(mut self, particulates: &'a mut dyn ParticulateSensor) -> Self {
        self.particulates = Some(particulates);
        self
    }

    /// Climate read; the sensor has no reset line so failure is final
    pub fn read_climate(&mut self) -> EngineResult<RawClimateSample> {
        self.climate
            .read_raw_climate()
            .map_err(|cause| EngineError::SensorRead { sensor: "climate", cause })
    }

    /// Gas read with one reset-and-retry
    pub fn read_gas(&mut self) -> EngineResult<GasRawTriplet> {
        let gas = &mut *self.gas;
        let triplet = read_with_retry("gas", gas, |g| g.read_raw_gas(), |g| g.reset())?;
        // Drivers may hand back fractional ohms
        Ok(GasRawTriplet::new(triplet.reducing, triplet.oxidising, triplet.nh3))
    }

    /// Particulate read with one reset-and-retry, `None` without a counter
    pub fn read_particulates(&mut self) -> EngineResult<Option<ParticulateSample>> {
        match self.particulates.as_deref_mut() {
            Some(pm) => read_with_retry("particulate", pm, |p| p.read_particulates(), |p| p.reset()).map(Some),
            None => Ok(None),
        }
    }
}

/// Read, and on failure reset and read exactly once more
pub fn read_with_retry<D: ?Sized, T>(
    sensor: &'static str,
    device: &mut D,
    mut read: impl FnMut(&mut D) -> Result<T, SensorError>,
    reset: impl FnOnce(&mut D),
) -> EngineResult<T> {
    match read(device) {
        Ok(value) => Ok(value),
        Err(first) => {
            log_warn!("{} sensor read failed ({}), resetting", sensor, first);
            let _ = first;
            reset(device);
            read(device).map_err(|cause| EngineError::SensorRead { sensor, cause })
        }
    }
}
