//! Gas Sensor Constants
//!
//! ## Drift Compensation
//!
//! Metal-oxide sensing resistance moves with ambient conditions. A linear
//! model per channel, fitted from a month of logged diagnostics, removes the
//! environmental part relative to the calibration reference point:
//!
//! ```text
//! Rs_comp = Rs_raw - (k_t·ΔT + k_h·ΔH + k_b·ΔP)
//! ```
//!
//! ## Concentration Curves
//!
//! `ppm = 10^(m·log10(Rs/R0) + c)` with slope/intercept read off the
//! manufacturer's sensitivity graphs. The values are kept exactly so new
//! readings stay comparable with years of stored telemetry.

/// Reducing channel drift coefficients `(k_t, k_h, k_b)` in Ω per unit.
pub const RED_DRIFT: [f64; 3] = [-5522.0, -3128.0, -915.0];

/// Oxidising channel drift coefficients `(k_t, k_h, k_b)` in Ω per unit.
pub const OXI_DRIFT: [f64; 3] = [-5144.0, 1757.0, -566.0];

/// Ammonia channel drift coefficients `(k_t, k_h, k_b)` in Ω per unit.
pub const NH3_DRIFT: [f64; 3] = [-5000.0, -1499.0, -1000.0];

/// Reducing curve `(slope, intercept)` in log10 space.
pub const RED_CURVE: (f64, f64) = (-1.25, 0.64);

/// Oxidising curve `(slope, intercept)` in log10 space.
pub const OXI_CURVE: (f64, f64) = (1.0, -0.8129);

/// Ammonia curve `(slope, intercept)` in log10 space.
pub const NH3_CURVE: (f64, f64) = (-1.8, -0.163);

/// Replacement for a non-positive `Rs/R0` ratio so the logarithm stays defined.
pub const MIN_RESISTANCE_RATIO: f64 = 0.0001;

/// Number of daily samples averaged into the baseline.
pub const CALIBRATION_WINDOW_DAYS: usize = 7;

/// Default hour of day (local time) for the daily recalibration.
pub const DEFAULT_CALIBRATION_HOUR: u8 = 3;
