//! Outbound records produced on the long cadence
//!
//! [`TelemetryRecord`] is the home-automation payload. Its JSON keys are
//! fixed by existing consumers (including other monitors that display this
//! unit as a remote station), so every field carries an explicit rename.
//! [`DiagnosticRecord`] logs raw and corrected values side by side for
//! refitting the compensation curves.

use heapless::String;

use crate::utils::round_to;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Short protocol code such as `"1"`
pub type Code = String<2>;

/// Forecast text with line breaks flattened
pub type ForecastText = String<40>;

/// Forecast block of a telemetry record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TelemetryForecast {
    /// Three hours of history exist
    #[cfg_attr(feature = "serde", serde(rename = "Valid"))]
    pub valid: bool,
    /// 3-hour change, 0.1 hPa resolution
    #[cfg_attr(feature = "serde", serde(rename = "3 Hour Change"))]
    pub change_hpa: f64,
    /// Single-line forecast text
    #[cfg_attr(feature = "serde", serde(rename = "Forecast"))]
    pub forecast: ForecastText,
}

impl TelemetryForecast {
    /// Block for a forecast, flattening its text
    pub fn new(valid: bool, change_hpa: f64, text: &str) -> Self {
        Self {
            valid,
            change_hpa: round_to(change_hpa, 1),
            forecast: single_line(text),
        }
    }
}

/// Home-automation telemetry payload
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TelemetryRecord {
    /// Temperature (°C)
    #[cfg_attr(feature = "serde", serde(rename = "Temp"))]
    pub temp: f64,
    /// Humidity (%) and humidity status code
    #[cfg_attr(feature = "serde", serde(rename = "Hum"))]
    pub hum: (f64, Code),
    /// Pressure (hPa) and forecast code
    #[cfg_attr(feature = "serde", serde(rename = "Bar"))]
    pub bar: (f64, Code),
    /// PM1.0 (µg/m³)
    #[cfg_attr(feature = "serde", serde(rename = "P1", default, skip_serializing_if = "Option::is_none"))]
    pub p1: Option<f64>,
    /// PM2.5 (µg/m³)
    #[cfg_attr(feature = "serde", serde(rename = "P2.5", default, skip_serializing_if = "Option::is_none"))]
    pub p2_5: Option<f64>,
    /// PM10 (µg/m³)
    #[cfg_attr(feature = "serde", serde(rename = "P10", default, skip_serializing_if = "Option::is_none"))]
    pub p10: Option<f64>,
    /// Reducing gases (ppm), meaningful only when calibrated
    #[cfg_attr(feature = "serde", serde(rename = "Red"))]
    pub red: f64,
    /// Oxidising gases (ppm), meaningful only when calibrated
    #[cfg_attr(feature = "serde", serde(rename = "Oxi"))]
    pub oxi: f64,
    /// Ammonia (ppm), meaningful only when calibrated
    #[cfg_attr(feature = "serde", serde(rename = "NH3"))]
    pub nh3: f64,
    /// Lowest temperature since start
    #[cfg_attr(feature = "serde", serde(rename = "Min Temp"))]
    pub min_temp: Option<f64>,
    /// Highest temperature since start
    #[cfg_attr(feature = "serde", serde(rename = "Max Temp"))]
    pub max_temp: Option<f64>,
    /// Gas sensor warm-up complete
    #[cfg_attr(feature = "serde", serde(rename = "Gas Calibrated"))]
    pub gas_calibrated: bool,
    /// Present only on the first record after a barometer insertion
    #[cfg_attr(feature = "serde", serde(rename = "Forecast", default, skip_serializing_if = "Option::is_none"))]
    pub forecast: Option<TelemetryForecast>,
}

/// Raw-versus-corrected log line for fitting compensation curves
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagnosticRecord {
    /// Seconds since start
    #[cfg_attr(feature = "serde", serde(rename = "Run Time"))]
    pub run_time_s: u64,
    /// Raw temperature
    #[cfg_attr(feature = "serde", serde(rename = "Raw Temperature"))]
    pub raw_temp: f64,
    /// Locally compensated temperature
    #[cfg_attr(feature = "serde", serde(rename = "Output Temp"))]
    pub output_temp: f64,
    /// External reference temperature, when the feed was used
    #[cfg_attr(feature = "serde", serde(rename = "Real Temperature", default, skip_serializing_if = "Option::is_none"))]
    pub real_temp: Option<f64>,
    /// Raw humidity
    #[cfg_attr(feature = "serde", serde(rename = "Raw Humidity"))]
    pub raw_hum: f64,
    /// Locally compensated humidity
    #[cfg_attr(feature = "serde", serde(rename = "Output Humidity"))]
    pub output_hum: f64,
    /// External reference humidity, when the feed was used
    #[cfg_attr(feature = "serde", serde(rename = "Real Humidity", default, skip_serializing_if = "Option::is_none"))]
    pub real_hum: Option<f64>,
    /// Locally compensated pressure, when the local barometer was used
    #[cfg_attr(feature = "serde", serde(rename = "Output Bar", default, skip_serializing_if = "Option::is_none"))]
    pub output_bar: Option<f64>,
    /// External reference pressure, when the feed was used
    #[cfg_attr(feature = "serde", serde(rename = "Real Bar", default, skip_serializing_if = "Option::is_none"))]
    pub real_bar: Option<f64>,
    /// Raw station pressure
    #[cfg_attr(feature = "serde", serde(rename = "Raw Bar"))]
    pub raw_bar: f64,
    /// Oxidising gases (ppm)
    #[cfg_attr(feature = "serde", serde(rename = "Oxi"))]
    pub oxi: f64,
    /// Reducing gases (ppm)
    #[cfg_attr(feature = "serde", serde(rename = "Red"))]
    pub red: f64,
    /// Ammonia (ppm)
    #[cfg_attr(feature = "serde", serde(rename = "NH3"))]
    pub nh3: f64,
    /// Raw oxidising resistance
    #[cfg_attr(feature = "serde", serde(rename = "Raw OxiRS"))]
    pub raw_oxi_rs: f64,
    /// Raw reducing resistance
    #[cfg_attr(feature = "serde", serde(rename = "Raw RedRS"))]
    pub raw_red_rs: f64,
    /// Raw ammonia resistance
    #[cfg_attr(feature = "serde", serde(rename = "Raw NH3RS"))]
    pub raw_nh3_rs: f64,
}

/// Code string for a short protocol value
pub fn code(value: &str) -> Code {
    let mut out = Code::new();
    // Protocol codes are one or two ASCII digits
    for c in value.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Replace line breaks with spaces, truncating at capacity
pub fn single_line(text: &str) -> ForecastText {
    let mut out = ForecastText::new();
    for c in text.chars() {
        let c = if c == '\n' { ' ' } else { c };
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
