//! Constants for Enviromon Core
//!
//! Centralized, documented constants used throughout the engine. Every
//! compensation coefficient and curve constant lives here so that a change to
//! a fitted value is a one-line diff that can be checked against historical
//! telemetry.
//!
//! ## Organization
//!
//! - **Physics**: barometric formula constants
//! - **Climate**: polynomial temperature/humidity correction coefficients
//! - **Gas**: drift coefficients and power-law curve constants
//! - **Time**: cadences, warm-up and staleness windows
//! - **Aqi**: default severity threshold ladders
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Use descriptive names that include units
//! 3. Fitted values are preserved bit-for-bit; do not "tidy" them

/// Barometric formula constants.
pub mod physics;

/// Temperature and humidity correction coefficient sets.
pub mod climate;

/// Gas sensor drift coefficients and concentration curves.
pub mod gas;

/// Cadences, warm-up duration and acceptance windows.
pub mod time;

/// Default air-quality threshold ladders.
pub mod aqi;

// Re-export commonly used constants for convenience
pub use physics::{BAROMETRIC_EXPONENT, KELVIN_OFFSET, TEMPERATURE_LAPSE_RATE_K_PER_M};

pub use time::{
    MS_PER_SECOND, BAROMETER_INTERVAL_MS, EXTERNAL_FEED_STALENESS_MS,
    GAS_WARMUP_MS, SNAPSHOT_MAX_AGE_MS,
};

pub use aqi::AQI_LEVEL_COUNT;
