//! Telemetry payload encoding
//!
//! Records are published as compact JSON. Key names come from the record
//! types in `enviromon-core` and are shared with peer monitors, which decode
//! the same payload as a remote station.

use enviromon_core::{DiagnosticRecord, TelemetryRecord};

use crate::ConnectorResult;

/// Encode the home-automation telemetry payload
pub fn encode_telemetry(record: &TelemetryRecord) -> ConnectorResult<String> {
    Ok(serde_json::to_string(record)?)
}

/// Encode the diagnostic record
pub fn encode_diagnostic(record: &DiagnosticRecord) -> ConnectorResult<String> {
    Ok(serde_json::to_string(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enviromon_core::records::code;
    use enviromon_core::TelemetryForecast;
    use serde_json::{json, Value};

    fn record() -> TelemetryRecord {
        TelemetryRecord {
            temp: 21.4,
            hum: (47.2, code("2")),
            bar: (1016.3, code("1")),
            p1: Some(2.0),
            p2_5: Some(3.0),
            p10: Some(4.0),
            red: 1.25,
            oxi: 0.08,
            nh3: 0.61,
            min_temp: Some(19.9),
            max_temp: Some(22.0),
            gas_calibrated: true,
            forecast: None,
        }
    }

    #[test]
    fn telemetry_uses_published_key_names() {
        let json: Value = serde_json::from_str(&encode_telemetry(&record()).unwrap()).unwrap();
        assert_eq!(json["Temp"], json!(21.4));
        assert_eq!(json["Hum"], json!([47.2, "2"]));
        assert_eq!(json["Bar"], json!([1016.3, "1"]));
        assert_eq!(json["P2.5"], json!(3.0));
        assert_eq!(json["NH3"], json!(0.61));
        assert_eq!(json["Min Temp"], json!(19.9));
        assert_eq!(json["Gas Calibrated"], json!(true));
        assert!(json.get("Forecast").is_none());
    }

    #[test]
    fn forecast_block_and_missing_particulates() {
        let mut record = record();
        record.p1 = None;
        record.p2_5 = None;
        record.p10 = None;
        record.forecast = Some(TelemetryForecast::new(true, -1.24, "Poorer\nWeather"));

        let json: Value = serde_json::from_str(&encode_telemetry(&record).unwrap()).unwrap();
        assert!(json.get("P1").is_none());
        assert_eq!(json["Forecast"]["Valid"], json!(true));
        assert_eq!(json["Forecast"]["3 Hour Change"], json!(-1.2));
        assert_eq!(json["Forecast"]["Forecast"], json!("Poorer Weather"));
    }

    #[test]
    fn diagnostic_omits_absent_sources() {
        let record = DiagnosticRecord {
            run_time_s: 900,
            raw_temp: 27.31,
            output_temp: 21.4,
            real_temp: None,
            raw_hum: 36.2,
            output_hum: 47.2,
            real_hum: None,
            output_bar: Some(1016.3),
            real_bar: None,
            raw_bar: 1004.1,
            oxi: 0.08,
            red: 1.25,
            nh3: 0.61,
            raw_oxi_rs: 21_000.0,
            raw_red_rs: 180_000.0,
            raw_nh3_rs: 84_000.0,
        };
        let json: Value = serde_json::from_str(&encode_diagnostic(&record).unwrap()).unwrap();
        assert_eq!(json["Run Time"], json!(900));
        assert_eq!(json["Output Bar"], json!(1016.3));
        assert!(json.get("Real Temperature").is_none());
        assert!(json.get("Real Bar").is_none());
        assert_eq!(json["Raw RedRS"], json!(180_000.0));
    }
}
