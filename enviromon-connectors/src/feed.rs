//! External feed decoding
//!
//! Home-automation controllers publish every device on a shared topic, so a
//! payload is matched on both topic and device identity before it is trusted:
//!
//! ```text
//! temperature/humidity  {"name": "Garden", "svalue1": "18.4", "svalue2": "63", ...}
//! barometer             {"idx": 712, "svalue": "1013.2;0", ...}
//! peer monitor          TelemetryRecord JSON
//! ```
//!
//! The barometer `svalue` ends in a two-character forecast suffix that is
//! dropped before parsing.

use enviromon_core::constants::time::REMOTE_STATION_STALENESS_MS;
use enviromon_core::time::{elapsed_ms, Timestamp};
use enviromon_core::{ExternalUpdate, TelemetryRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ConnectorError, ConnectorResult};

/// Topics and device identities of the subscribed feeds
///
/// A `None` topic disables that feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Topic carrying the external temperature/humidity device
    pub temp_hum_topic: Option<String>,
    /// `name` of the temperature/humidity device
    pub temp_hum_name: String,
    /// Topic carrying the external barometer
    pub barometer_topic: Option<String>,
    /// `idx` of the barometer device
    pub barometer_idx: u64,
    /// Telemetry topic of a peer (outdoor) monitor
    pub outdoor_topic: Option<String>,
}

impl FeedConfig {
    /// Topics to subscribe to, without duplicates
    pub fn topics(&self) -> Vec<&str> {
        let mut topics: Vec<&str> = Vec::new();
        for topic in [&self.temp_hum_topic, &self.barometer_topic, &self.outdoor_topic]
            .into_iter()
            .flatten()
        {
            if !topics.contains(&topic.as_str()) {
                topics.push(topic);
            }
        }
        topics
    }
}

/// What a payload turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum Feed {
    /// Reading for the source arbiter
    External(ExternalUpdate),
    /// Telemetry from a peer monitor
    Outdoor(TelemetryRecord),
    /// Known topic, but some other device
    Ignored,
}

/// Last record received from a peer monitor
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteStation {
    pub record: TelemetryRecord,
    pub received_at: Timestamp,
}

impl RemoteStation {
    /// Whether the record is recent enough to show
    pub fn is_current(&self, now: Timestamp) -> bool {
        elapsed_ms(self.received_at, now) < REMOTE_STATION_STALENESS_MS
    }
}

/// Decode one payload received on `topic`
pub fn decode_feed(config: &FeedConfig, topic: &str, payload: &[u8]) -> ConnectorResult<Feed> {
    let mut known = false;
    let mut json: Option<Value> = None;

    if config.temp_hum_topic.as_deref() == Some(topic) {
        known = true;
        let value = parse_json(&mut json, payload)?;
        if value.get("name").and_then(Value::as_str) == Some(config.temp_hum_name.as_str()) {
            let temperature_c = number_field(value, "svalue1")?;
            let humidity_pct = number_field(value, "svalue2")?;
            return Ok(Feed::External(ExternalUpdate::TemperatureHumidity { temperature_c, humidity_pct }));
        }
    }

    if config.barometer_topic.as_deref() == Some(topic) {
        known = true;
        let value = parse_json(&mut json, payload)?;
        if idx_matches(value.get("idx"), config.barometer_idx) {
            let svalue = str_field(value, "svalue")?;
            let hpa = parse_number("svalue", strip_forecast_suffix(svalue))?;
            return Ok(Feed::External(ExternalUpdate::Barometer(hpa)));
        }
    }

    if config.outdoor_topic.as_deref() == Some(topic) {
        let record: TelemetryRecord = serde_json::from_slice(payload)?;
        return Ok(Feed::Outdoor(record));
    }

    if known {
        Ok(Feed::Ignored)
    } else {
        Err(ConnectorError::UnknownTopic(topic.to_owned()))
    }
}

fn parse_json<'a>(cache: &'a mut Option<Value>, payload: &[u8]) -> ConnectorResult<&'a Value> {
    if cache.is_none() {
        *cache = Some(serde_json::from_slice(payload)?);
    }
    cache
        .as_ref()
        .ok_or_else(|| ConnectorError::Payload("empty payload".to_owned()))
}

fn idx_matches(idx: Option<&Value>, expected: u64) -> bool {
    match idx {
        Some(Value::Number(n)) => n.as_u64() == Some(expected),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok() == Some(expected),
        _ => false,
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> ConnectorResult<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ConnectorError::Payload(format!("missing string field '{key}'")))
}

fn number_field(value: &Value, key: &str) -> ConnectorResult<f64> {
    match value.get(key) {
        Some(Value::String(s)) => parse_number(key, s),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| ConnectorError::Payload(format!("field '{key}' out of range"))),
        _ => Err(ConnectorError::Payload(format!("missing field '{key}'"))),
    }
}

fn parse_number(key: &str, text: &str) -> ConnectorResult<f64> {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ConnectorError::Payload(format!("field '{key}' is not a number: {text:?}"))),
    }
}

fn strip_forecast_suffix(svalue: &str) -> &str {
    let mut chars = svalue.chars();
    chars.next_back();
    chars.next_back();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FeedConfig {
        FeedConfig {
            temp_hum_topic: Some("domoticz/out".into()),
            temp_hum_name: "Garden".into(),
            barometer_topic: Some("domoticz/out".into()),
            barometer_idx: 712,
            outdoor_topic: Some("enviromon/outdoor".into()),
        }
    }

    #[test]
    fn decodes_temperature_humidity() {
        let payload = br#"{"name": "Garden", "svalue1": "18.4", "svalue2": "63", "idx": 5}"#;
        let feed = decode_feed(&config(), "domoticz/out", payload).unwrap();
        assert_eq!(
            feed,
            Feed::External(ExternalUpdate::TemperatureHumidity { temperature_c: 18.4, humidity_pct: 63.0 })
        );
    }

    #[test]
    fn decodes_barometer_and_strips_suffix() {
        let payload = br#"{"idx": 712, "svalue": "1013.2;0"}"#;
        let feed = decode_feed(&config(), "domoticz/out", payload).unwrap();
        assert_eq!(feed, Feed::External(ExternalUpdate::Barometer(1013.2)));
    }

    #[test]
    fn barometer_idx_may_be_a_string() {
        let payload = br#"{"idx": "712", "svalue": "998.7;4"}"#;
        let feed = decode_feed(&config(), "domoticz/out", payload).unwrap();
        assert_eq!(feed, Feed::External(ExternalUpdate::Barometer(998.7)));
    }

    #[test]
    fn other_devices_on_shared_topic_are_ignored() {
        let payload = br#"{"name": "Kitchen", "idx": 3, "svalue1": "21.0", "svalue2": "40"}"#;
        let feed = decode_feed(&config(), "domoticz/out", payload).unwrap();
        assert_eq!(feed, Feed::Ignored);
    }

    #[test]
    fn unknown_topic_is_an_error() {
        let err = decode_feed(&config(), "somewhere/else", b"{}").unwrap_err();
        assert!(matches!(err, ConnectorError::UnknownTopic(t) if t == "somewhere/else"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let payload = br#"{"name": "Garden", "svalue1": "warm", "svalue2": "63"}"#;
        let err = decode_feed(&config(), "domoticz/out", payload).unwrap_err();
        assert!(matches!(err, ConnectorError::Payload(_)));

        let err = decode_feed(&config(), "domoticz/out", b"not json").unwrap_err();
        assert!(matches!(err, ConnectorError::Json(_)));
    }

    #[test]
    fn short_barometer_value_is_rejected() {
        let payload = br#"{"idx": 712, "svalue": "1"}"#;
        let err = decode_feed(&config(), "domoticz/out", payload).unwrap_err();
        assert!(matches!(err, ConnectorError::Payload(_)));
    }

    #[test]
    fn topics_are_deduplicated() {
        assert_eq!(config().topics(), vec!["domoticz/out", "enviromon/outdoor"]);
    }

    #[test]
    fn remote_station_expires_after_ten_minutes() {
        let station = RemoteStation {
            record: serde_json::from_str(PEER).unwrap(),
            received_at: 1_000,
        };
        assert!(station.is_current(1_000 + 599_999));
        assert!(!station.is_current(1_000 + 600_000));
    }

    #[test]
    fn decodes_peer_telemetry() {
        let feed = decode_feed(&config(), "enviromon/outdoor", PEER.as_bytes()).unwrap();
        match feed {
            Feed::Outdoor(record) => {
                assert_eq!(record.temp, 12.5);
                assert_eq!(record.hum.1.as_str(), "2");
                assert!(record.gas_calibrated);
            }
            other => panic!("unexpected feed {other:?}"),
        }
    }

    const PEER: &str = r#"{
        "Temp": 12.5, "Hum": [55.0, "2"], "Bar": [1012.3, "1"],
        "P1": 1.0, "P2.5": 2.0, "P10": 3.0,
        "Red": 1.2, "Oxi": 0.1, "NH3": 0.6,
        "Min Temp": 9.1, "Max Temp": 14.0, "Gas Calibrated": true
    }"#;
}
