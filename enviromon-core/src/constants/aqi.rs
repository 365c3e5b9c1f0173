//! Air-Quality Threshold Ladders
//!
//! Each ladder holds four ascending cut points. A reading strictly above `n`
//! of them is at severity level `n`.
//!
//! ```text
//! level:   0      1      2      3      4
//!        ---|------|------|------|------>
//!           t0     t1     t2     t3
//! ```

/// Number of cut points in every ladder.
pub const AQI_LEVEL_COUNT: usize = 4;

/// PM1.0 ladder (µg/m³).
pub const PM1_LADDER: [f64; AQI_LEVEL_COUNT] = [6.0, 17.0, 27.0, 35.0];

/// PM2.5 ladder (µg/m³).
pub const PM2_5_LADDER: [f64; AQI_LEVEL_COUNT] = [11.0, 35.0, 53.0, 70.0];

/// PM10 ladder (µg/m³).
pub const PM10_LADDER: [f64; AQI_LEVEL_COUNT] = [16.0, 50.0, 75.0, 100.0];

/// Oxidising gas ladder (ppm).
pub const OXI_LADDER: [f64; AQI_LEVEL_COUNT] = [0.5, 1.0, 3.0, 5.0];

/// Reducing gas ladder (ppm).
pub const RED_LADDER: [f64; AQI_LEVEL_COUNT] = [5.0, 30.0, 50.0, 75.0];

/// Ammonia ladder (ppm).
pub const NH3_LADDER: [f64; AQI_LEVEL_COUNT] = [5.0, 30.0, 50.0, 75.0];
