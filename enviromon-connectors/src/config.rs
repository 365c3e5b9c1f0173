//! Monitor configuration
//!
//! Decoded from a JSON document. Every section is optional and falls back
//! to the engine defaults:
//!
//! ```json
//! {
//!   "engine": { "altitude_m": 85.0, "weather_cover": true, "calibration_hour": 3 },
//!   "feeds": { "temp_hum_topic": "domoticz/out", "temp_hum_name": "Garden" },
//!   "publish": { "telemetry": "enviromon/indoor" },
//!   "snapshot_path": "/var/lib/enviromon/state.json"
//! }
//! ```

use std::path::PathBuf;

use enviromon_core::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::feed::FeedConfig;
use crate::ConnectorResult;

/// Topics the monitor publishes on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishTopics {
    /// Telemetry payload topic
    pub telemetry: String,
    /// Diagnostic record topic, `None` to only log it
    pub diagnostic: Option<String>,
}

impl Default for PublishTopics {
    fn default() -> Self {
        Self {
            telemetry: "enviromon/telemetry".to_owned(),
            diagnostic: None,
        }
    }
}

/// Everything a monitor host needs besides its sensors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub engine: EngineConfig,
    pub feeds: FeedConfig,
    pub publish: PublishTopics,
    /// Snapshot file; `None` disables persistence
    pub snapshot_path: Option<PathBuf>,
}

impl MonitorConfig {
    /// Decode and validate a JSON configuration
    pub fn from_json_str(json: &str) -> ConnectorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.engine.validate()?;
        Ok(config)
    }
}
