//! Host Adapters for the Enviromon Engine
//!
//! ## Overview
//!
//! `enviromon-core` performs no I/O. This crate supplies the std-side
//! collaborators a monitor needs around it:
//!
//! - [`feed`]: decoding of home-automation feed payloads into
//!   [`ExternalUpdate`](enviromon_core::ExternalUpdate)s and peer records
//! - [`store`]: a JSON file [`SnapshotStore`](enviromon_core::traits::SnapshotStore)
//! - [`telemetry`]: JSON encoding of the outbound records
//! - [`clock`]: a wall clock implementing [`TimeSource`](enviromon_core::traits::TimeSource)
//! - [`monitor`]: the async host loop serializing every writer behind one mutex
//!
//! ## Message Flow
//!
//! ```text
//! feed subscriber ──ingest──▶ FeedHandle ──┐
//!                                          ├─▶ Mutex<Engine>
//! interval loop ─────tick───▶ Monitor ─────┘
//!                                │
//!                                ├─▶ JsonFileStore   (snapshot)
//!                                └─▶ Connector       (telemetry JSON)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use enviromon_connectors::{clock::SystemClock, config::MonitorConfig, monitor::Monitor, LogConnector};
//! # use enviromon_core::Sensors;
//! # async fn run(mut sensors: Sensors<'_>) -> enviromon_connectors::ConnectorResult<()> {
//! let config = MonitorConfig::from_json_str(r#"{ "snapshot_path": "/var/lib/enviromon/state.json" }"#)?;
//! let clock = SystemClock;
//! let mut monitor = Monitor::start(config, &clock, &mut sensors, LogConnector::default()).await?;
//!
//! // Hand this to the feed subscriber task
//! let feeds = monitor.feed_handle();
//! # let _ = feeds;
//!
//! monitor.run(&clock, &mut sensors, std::time::Duration::from_millis(500), None).await?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod feed;
pub mod monitor;
pub mod store;
pub mod telemetry;

pub use clock::SystemClock;
pub use config::{MonitorConfig, PublishTopics};
pub use feed::{decode_feed, Feed, FeedConfig, RemoteStation};
pub use monitor::{FeedHandle, Monitor};
pub use store::JsonFileStore;

use enviromon_core::EngineError;
use thiserror::Error;

/// Result type for connector operations
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("Payload error: {0}")]
    Payload(String),

    #[error("Not connected")]
    NotConnected,
}

/// Outbound transport for telemetry payloads
pub trait Connector {
    type Error: std::fmt::Display;

    /// Publish `data` on `topic`
    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Check if connected
    fn is_connected(&self) -> bool;
}

/// Publishing statistics kept by the monitor
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages that failed to send
    pub messages_failed: u64,
    /// Total payload bytes sent
    pub bytes_sent: u64,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    fn record<E: std::fmt::Display>(&mut self, bytes: usize, result: &Result<(), E>) {
        match result {
            Ok(()) => {
                self.messages_sent += 1;
                self.bytes_sent += bytes as u64;
            }
            Err(err) => {
                self.messages_failed += 1;
                self.last_error = Some(err.to_string());
            }
        }
    }
}

/// Connector that writes every payload to the log
///
/// Used on monitors without a broker and in tests, where `sent` keeps a copy
/// of everything published.
#[derive(Debug, Default, Clone)]
pub struct LogConnector {
    /// `(topic, payload)` pairs in publish order
    pub sent: Vec<(String, String)>,
}

impl Connector for LogConnector {
    type Error = ConnectorError;

    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        let payload = String::from_utf8_lossy(data).into_owned();
        log::info!("{}: {}", topic, payload);
        self.sent.push((topic.to_owned(), payload));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}
