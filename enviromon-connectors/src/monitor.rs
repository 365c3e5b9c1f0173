//! Async monitor host
//!
//! The engine is shared between the cycle loop and the feed subscriber, so
//! it lives behind one `tokio::sync::Mutex`. Every write (ticks, feed
//! records, snapshot restore) takes that lock; a reader never observes a
//! half-applied cycle.
//!
//! Sensors are borrowed per call and never cross a task boundary, which keeps
//! driver types free of `Send` requirements.

use std::sync::Arc;
use std::time::Duration;

use enviromon_core::time::Timestamp;
use enviromon_core::traits::{SnapshotStore, TimeSource};
use enviromon_core::{AqiResult, Engine, ForecastResult, Sensors, TickReport};
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::config::{MonitorConfig, PublishTopics};
use crate::feed::{decode_feed, Feed, FeedConfig, RemoteStation};
use crate::store::JsonFileStore;
use crate::telemetry::{encode_diagnostic, encode_telemetry};
use crate::{ConnectionStats, Connector, ConnectorResult};

/// Cloneable handle for the feed subscriber task
#[derive(Debug, Clone)]
pub struct FeedHandle {
    engine: Arc<Mutex<Engine>>,
    feeds: Arc<FeedConfig>,
    outdoor: Arc<Mutex<Option<RemoteStation>>>,
}

impl FeedHandle {
    /// Decode a payload and apply it
    ///
    /// A payload that fails to decode leaves the engine untouched.
    pub async fn ingest(&self, topic: &str, payload: &[u8], now: Timestamp) -> ConnectorResult<Feed> {
        let feed = decode_feed(&self.feeds, topic, payload)?;
        match &feed {
            Feed::External(update) => {
                debug!("External feed on {}: {:?}", topic, update);
                self.engine.lock().await.receive_external_feed(*update, now);
            }
            Feed::Outdoor(record) => {
                debug!("Outdoor record on {}", topic);
                *self.outdoor.lock().await = Some(RemoteStation { record: record.clone(), received_at: now });
            }
            Feed::Ignored => {}
        }
        Ok(feed)
    }
}

/// Monitor loop around one engine
pub struct Monitor<C: Connector> {
    engine: Arc<Mutex<Engine>>,
    feeds: FeedHandle,
    topics: PublishTopics,
    store: Option<JsonFileStore>,
    connector: C,
    stats: ConnectionStats,
}

impl<C: Connector> Monitor<C> {
    /// Start the engine, restoring from the configured snapshot file
    pub async fn start<T: TimeSource>(
        config: MonitorConfig,
        clock: &T,
        sensors: &mut Sensors<'_>,
        connector: C,
    ) -> ConnectorResult<Self> {
        let mut store = config.snapshot_path.map(JsonFileStore::new);
        let now = clock.now();
        let engine = match store.as_mut() {
            Some(store) => Engine::start_from_store(config.engine, now, sensors, store)?,
            None => Engine::start(config.engine, now, sensors)?,
        };
        info!("Monitor started, engine {}", enviromon_core::VERSION);
        Ok(Self::new(engine, config.feeds, config.publish, store, connector))
    }

    /// Wrap an already started engine
    pub fn new(
        engine: Engine,
        feeds: FeedConfig,
        topics: PublishTopics,
        store: Option<JsonFileStore>,
        connector: C,
    ) -> Self {
        let engine = Arc::new(Mutex::new(engine));
        let feeds = FeedHandle {
            engine: Arc::clone(&engine),
            feeds: Arc::new(feeds),
            outdoor: Arc::new(Mutex::new(None)),
        };
        Self {
            engine,
            feeds,
            topics,
            store,
            connector,
            stats: ConnectionStats::default(),
        }
    }

    /// Handle for the feed subscriber
    pub fn feed_handle(&self) -> FeedHandle {
        self.feeds.clone()
    }

    /// Shortcut for [`FeedHandle::ingest`]
    pub async fn ingest(&self, topic: &str, payload: &[u8], now: Timestamp) -> ConnectorResult<Feed> {
        self.feeds.ingest(topic, payload, now).await
    }

    /// Run one engine cycle and hand its outputs to storage and the connector
    ///
    /// Storage and publish failures are logged and counted, only engine
    /// errors are returned.
    pub async fn tick(&mut self, now: Timestamp, hour_of_day: u8, sensors: &mut Sensors<'_>) -> ConnectorResult<TickReport> {
        let report = {
            let mut engine = self.engine.lock().await;
            engine.tick(now, hour_of_day, sensors)?
        };

        if report.warmed_up {
            info!("Gas sensor warm-up complete");
        }
        if let (Some(snapshot), Some(store)) = (&report.snapshot, self.store.as_mut()) {
            if let Err(err) = store.save(snapshot) {
                warn!("Snapshot not saved to {}: {}", store.path().display(), err);
            }
        }
        if let Some(record) = &report.telemetry {
            let payload = encode_telemetry(record)?;
            let topic = self.topics.telemetry.clone();
            self.publish(&topic, &payload);
        }
        if let Some(record) = &report.diagnostic {
            let payload = encode_diagnostic(record)?;
            match self.topics.diagnostic.clone() {
                Some(topic) => self.publish(&topic, &payload),
                None => debug!("Diagnostic: {}", payload),
            }
        }
        Ok(report)
    }

    fn publish(&mut self, topic: &str, payload: &str) {
        if !self.connector.is_connected() {
            warn!("Connector offline, dropping payload for {}", topic);
            self.stats.record(0, &Err(crate::ConnectorError::NotConnected));
            return;
        }
        let result = self.connector.send(topic, payload.as_bytes());
        if let Err(err) = &result {
            warn!("Publish to {} failed: {}", topic, err);
        }
        self.stats.record(payload.len(), &result);
    }

    /// Tick on a fixed period until `cycles` ticks ran (forever with `None`)
    pub async fn run<T: TimeSource>(
        &mut self,
        clock: &T,
        sensors: &mut Sensors<'_>,
        period: Duration,
        cycles: Option<u64>,
    ) -> ConnectorResult<()> {
        let mut interval = tokio::time::interval(period);
        let mut completed = 0u64;
        loop {
            interval.tick().await;
            self.tick(clock.now(), clock.hour_of_day(), sensors).await?;
            completed += 1;
            if cycles.is_some_and(|n| completed >= n) {
                return Ok(());
            }
        }
    }

    /// Peer monitor record, while it is younger than ten minutes
    pub async fn outdoor(&self, now: Timestamp) -> Option<RemoteStation> {
        self.feeds
            .outdoor
            .lock()
            .await
            .as_ref()
            .filter(|station| station.is_current(now))
            .cloned()
    }

    pub async fn air_quality(&self) -> AqiResult {
        self.engine.lock().await.air_quality()
    }

    pub async fn forecast(&self) -> ForecastResult {
        *self.engine.lock().await.forecast()
    }

    /// Shared engine, for display collaborators
    pub fn engine(&self) -> Arc<Mutex<Engine>> {
        Arc::clone(&self.engine)
    }

    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}
