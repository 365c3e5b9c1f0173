//! Altitude Compensation for the Barometer
//!
//! Station pressure falls roughly 12 hPa per 100 m of elevation, so a raw
//! reading is meaningless for forecasting unless reduced to sea level:
//!
//! ```text
//! factor    = (1 - L·h / (T + L·h + 273.15)) ^ -5.257
//! sea_level = raw · factor
//! ```
//!
//! `T` is the temperature the engine selected for this cycle, which may come
//! from the external feed. When the external barometer is already sea-level
//! corrected the factor is divided back out before pressure goes to upstream
//! services that do their own compensation.

use crate::constants::physics::{
    BAROMETRIC_EXPONENT, KELVIN_OFFSET, TEMPERATURE_LAPSE_RATE_K_PER_M,
};

/// Sea-level reduction for a station at a fixed altitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarometricAltitudeCompensator {
    altitude_m: f64,
}

impl BarometricAltitudeCompensator {
    /// Compensator for a station `altitude_m` metres above sea level
    pub const fn new(altitude_m: f64) -> Self {
        Self { altitude_m }
    }

    /// Station altitude in metres
    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    /// Multiplicative reduction factor at `temperature_c`
    pub fn compensation_factor(&self, temperature_c: f64) -> f64 {
        let lh = TEMPERATURE_LAPSE_RATE_K_PER_M * self.altitude_m;
        let base = 1.0 - lh / (temperature_c + lh + KELVIN_OFFSET);
        libm::pow(base, -BAROMETRIC_EXPONENT)
    }

    /// Station pressure → sea-level pressure
    pub fn correct(&self, raw_hpa: f64, temperature_c: f64) -> f64 {
        raw_hpa * self.compensation_factor(temperature_c)
    }

    /// Sea-level pressure → station pressure
    pub fn remove(&self, sea_level_hpa: f64, temperature_c: f64) -> f64 {
        sea_level_hpa / self.compensation_factor(temperature_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_station_is_identity() {
        let comp = BarometricAltitudeCompensator::new(0.0);
        assert!((comp.compensation_factor(20.0) - 1.0).abs() < 1e-12);
        assert!((comp.correct(1015.0, 20.0) - 1015.0).abs() < 0.1);
    }

    #[test]
    fn elevated_station_reads_higher_at_sea_level() {
        let comp = BarometricAltitudeCompensator::new(100.0);
        let corrected = comp.correct(1000.0, 15.0);
        // ~12 hPa per 100 m
        assert!(corrected > 1010.0 && corrected < 1014.0);
    }

    #[test]
    fn remove_inverts_correct() {
        let comp = BarometricAltitudeCompensator::new(350.0);
        let sea = comp.correct(972.4, 8.0);
        assert!((comp.remove(sea, 8.0) - 972.4).abs() < 1e-9);
    }
}
