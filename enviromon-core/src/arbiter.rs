//! External source arbitration
//!
//! A home-automation hub may publish temperature/humidity and barometer
//! readings from better-placed sensors. Each cycle the arbiter decides per
//! quantity whether that external value is fresh enough to use. If it is
//! not, the local (compensated) sensor is used instead. Staleness is never an
//! error, and only a change of the selected source is logged.
//!
//! Raw local readings are captured every cycle regardless of the choice,
//! because gas compensation always works against raw climate.

use crate::constants::time::EXTERNAL_FEED_STALENESS_MS;
use crate::time::Timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a quantity came from this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Source {
    /// On-board sensor after compensation
    #[default]
    Local,
    /// External feed
    External,
}

impl Source {
    /// Lowercase label for logs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::External => "external",
        }
    }
}

/// Decoded external feed message
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExternalUpdate {
    /// Temperature (°C) and relative humidity (%)
    TemperatureHumidity {
        /// Temperature in °C
        temperature_c: f64,
        /// Relative humidity in %
        humidity_pct: f64,
    },
    /// Sea-level pressure (hPa)
    Barometer(f64),
}

/// Last value of one external quantity and when it arrived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalFeedRecord<T> {
    value: Option<T>,
    updated_at: Option<Timestamp>,
}

impl<T> Default for ExternalFeedRecord<T> {
    fn default() -> Self {
        Self { value: None, updated_at: None }
    }
}

impl<T: Copy> ExternalFeedRecord<T> {
    /// Store a new value received at `now`
    pub fn update(&mut self, value: T, now: Timestamp) {
        self.value = Some(value);
        self.updated_at = Some(now);
    }

    /// True iff updated less than 500 s before `now`
    ///
    /// A record that was never updated is invalid. An update stamped after
    /// `now` (clock skew between tasks) counts as fresh.
    pub fn is_valid(&self, now: Timestamp) -> bool {
        match self.updated_at {
            Some(ts) => now.saturating_sub(ts) < EXTERNAL_FEED_STALENESS_MS,
            None => false,
        }
    }

    /// Value if still valid at `now`
    pub fn fresh_value(&self, now: Timestamp) -> Option<T> {
        if self.is_valid(now) {
            self.value
        } else {
            None
        }
    }

    /// Time of the last update
    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }
}

/// Chooses between external feeds and local sensors per cycle
#[derive(Debug, Clone, Default)]
pub struct ExternalSourceArbiter {
    temp_humidity: ExternalFeedRecord<(f64, f64)>,
    barometer: ExternalFeedRecord<f64>,
    last_temp_humidity_source: Option<Source>,
    last_barometer_source: Option<Source>,
}

impl ExternalSourceArbiter {
    /// Arbiter with no external data yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an external update received at `now`
    pub fn receive(&mut self, update: ExternalUpdate, now: Timestamp) {
        match update {
            ExternalUpdate::TemperatureHumidity { temperature_c, humidity_pct } => {
                self.temp_humidity.update((temperature_c, humidity_pct), now);
            }
            ExternalUpdate::Barometer(hpa) => self.barometer.update(hpa, now),
        }
    }

    /// External temperature/humidity if fresh, `None` means use local
    pub fn select_temp_humidity(&mut self, now: Timestamp) -> Option<(f64, f64)> {
        let selected = self.temp_humidity.fresh_value(now);
        let source = if selected.is_some() { Source::External } else { Source::Local };
        note_change("temperature/humidity", &mut self.last_temp_humidity_source, source);
        selected
    }

    /// External barometer if fresh, `None` means use local
    pub fn select_barometer(&mut self, now: Timestamp) -> Option<f64> {
        let selected = self.barometer.fresh_value(now);
        let source = if selected.is_some() { Source::External } else { Source::Local };
        note_change("barometer", &mut self.last_barometer_source, source);
        selected
    }

    /// External temperature/humidity record
    pub fn temp_humidity_record(&self) -> &ExternalFeedRecord<(f64, f64)> {
        &self.temp_humidity
    }

    /// External barometer record
    pub fn barometer_record(&self) -> &ExternalFeedRecord<f64> {
        &self.barometer
    }
}

fn note_change(quantity: &'static str, last: &mut Option<Source>, now: Source) {
    if *last != Some(now) {
        log_info!("Using {} {} source", now.as_str(), quantity);
        let _ = quantity;
        *last = Some(now);
    }
}
