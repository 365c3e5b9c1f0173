//! Calibration, compensation and forecasting engine for Enviromon
//!
//! Turns noisy, drifting raw readings from a combined climate sensor, a
//! three-channel metal-oxide gas sensor and a particulate counter into
//! trustworthy measurements, a short-range weather forecast and an overall
//! air-quality level.
//!
//! Key constraints:
//! - Runs without an allocator (`no_std` when `std` is disabled)
//! - No I/O inside the engine - sensors and storage are collaborators
//! - Every piece of mutable state lives in one [`EngineState`]
//!
//! ```no_run
//! use enviromon_core::{Engine, EngineConfig};
//! # use enviromon_core::sensors::{ClimateSensor, GasSensor, ParticulateSensor, Sensors};
//! # fn sensors() -> Sensors<'static> { unimplemented!() }
//!
//! let mut sensors = sensors();
//! let mut engine = Engine::start(EngineConfig::default(), 0, &mut sensors)?;
//!
//! // Called from the host loop, roughly twice a second
//! let report = engine.tick(500, 14, &mut sensors)?;
//! if let Some(climate) = report.climate {
//!     // Hand compensated values to the display/telemetry collaborators
//! }
//! # Ok::<(), enviromon_core::EngineError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Logging shims: route to `log` when available, compile away otherwise.
#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod aqi;
pub mod arbiter;
pub mod barometer;
pub mod compensation;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod forecast;
pub mod gas;
pub mod records;
pub mod sensors;
pub mod state;
pub mod table;
pub mod time;
pub mod traits;
pub mod utils;
pub mod window;

// Public API
pub use aqi::{AirQualityClassifier, AqiFactor, AqiLevel, AqiResult};
pub use arbiter::{ExternalSourceArbiter, ExternalUpdate, Source};
pub use barometer::{BarometerHistory, Trend};
pub use compensation::{BarometricAltitudeCompensator, ClimateCompensator, CompensatedClimate};
pub use config::EngineConfig;
pub use engine::{Engine, TickReport};
pub use errors::{EngineError, EngineResult, SensorError};
pub use forecast::{Forecast, ForecastResult};
pub use gas::{GasBaseline, GasCalibrationManager, GasCalibrationState, GasCompensationEngine, GasConcentrations};
pub use records::{DiagnosticRecord, TelemetryForecast, TelemetryRecord};
pub use sensors::{GasRawTriplet, ParticulateSample, RawClimateSample, Sensors};
pub use state::{EngineState, Snapshot};

/// Crate version, reported in telemetry headers
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
