//! Climate Correction Coefficients
//!
//! The combined climate sensor sits on the same board as the CPU, so it reads
//! warm and dry. The corrections below were fitted against a reference
//! station, once with the weather-protection cover fitted and once without
//! (display enabled). The selector is a configuration flag.
//!
//! ```text
//! T = a·raw³ + b·raw² + c·raw + d      (d also shifted by the user offset)
//! H = min(100, p·raw² + q·raw + r)
//! ```

/// Cubic temperature correction `(a, b, c, d)` without the weather cover.
pub const TEMP_CUBIC_UNCOVERED: [f64; 4] = [-0.0001, 0.0037, 1.00568, -6.78291];

/// Cubic temperature correction `(a, b, c, d)` with the weather cover fitted.
pub const TEMP_CUBIC_COVERED: [f64; 4] = [-0.00028, 0.01370, 1.07037, -12.35321];

/// Quadratic humidity correction `(p, q, r)` without the weather cover.
pub const HUM_QUADRATIC_UNCOVERED: [f64; 3] = [-0.0032, 1.6931, 0.9391];

/// Quadratic humidity correction `(p, q, r)` with the weather cover fitted.
pub const HUM_QUADRATIC_COVERED: [f64; 3] = [-0.0098, 2.0705, -1.2795];

/// Upper clamp applied to corrected relative humidity (%).
pub const HUMIDITY_CEILING_PCT: f64 = 100.0;

/// Below or at this corrected humidity the air is described as dry (%).
pub const HUMIDITY_DRY_MAX_PCT: f64 = 30.0;

/// At or above this corrected humidity the air is described as wet (%).
pub const HUMIDITY_WET_MIN_PCT: f64 = 70.0;
