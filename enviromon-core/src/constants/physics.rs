//! Physical Constants for Barometric Compensation
//!
//! The station reports sea-level equivalent pressure, so every local reading
//! is scaled by the hypsometric factor
//!
//! ```text
//! factor = (1 - L·h / (T + L·h + 273.15)) ^ -5.257
//! ```
//!
//! where `L` is the lapse rate, `h` the station altitude and `T` the current
//! air temperature in °C.

/// Standard temperature lapse rate in the troposphere (K/m).
///
/// Source: International Standard Atmosphere (ISA)
pub const TEMPERATURE_LAPSE_RATE_K_PER_M: f64 = 0.0065;

/// Offset between Celsius and Kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Exponent of the sea-level reduction formula.
///
/// Equals `g·M / (R·L)` for dry air, rounded as used by the station since
/// its first release. Changing it shifts every historical pressure reading.
pub const BAROMETRIC_EXPONENT: f64 = 5.257;

/// Pascals per hectopascal.
///
/// Upstream citizen-science endpoints take pressure in Pa.
pub const PA_PER_HPA: f64 = 100.0;
