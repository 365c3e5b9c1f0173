//! Barometric history and pressure trend
//!
//! Nine pressure samples taken every 20 minutes. Index 0 is the most recent.
//! On each insertion the value about to fall off the end is the reading from
//! three hours ago, and the difference to the new reading is the 3-hour
//! change used by the forecast.
//!
//! ```text
//! insert(p):  h[8] ─► three_hours_ago
//!             h[0..8] ─► h[1..9]
//!             p ─► h[0]
//! ```
//!
//! Zero marks an empty slot, so the history is only valid once the value
//! shifted out was non-zero.

use crate::table::{Interval, RangeTable, Row};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of history slots
pub const HISTORY_DEPTH: usize = 9;

/// Direction and strength of the 3-hour pressure change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Trend {
    /// Not enough history yet
    #[default]
    Unknown,
    /// Within ±1.1 hPa
    Steady,
    /// Falling
    Falling,
    /// Falling fast
    FallingFast,
    /// Falling very fast
    FallingVeryFast,
    /// Rising
    Rising,
    /// Rising fast
    RisingFast,
    /// Rising very fast
    RisingVeryFast,
}

impl Trend {
    /// Display symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::Steady => "-",
            Self::Falling => "<",
            Self::FallingFast => "<<",
            Self::FallingVeryFast => "<!",
            Self::Rising => ">",
            Self::RisingFast => ">>",
            Self::RisingVeryFast => ">!",
        }
    }

    /// Classify a 3-hour change in hPa
    pub fn from_change(change_hpa: f64) -> Self {
        TREND_BANDS.classify(change_hpa).unwrap_or(Trend::Unknown)
    }
}

static TREND_ROWS: [Row<Trend>; 7] = [
    Row::new(Interval::open(-1.1, 1.1), Trend::Steady),
    Row::new(Interval::open_closed(-4.0, -1.1), Trend::Falling),
    Row::new(Interval::open_closed(-10.0, -4.0), Trend::FallingFast),
    Row::new(Interval::at_most(-10.0), Trend::FallingVeryFast),
    Row::new(Interval::closed_open(1.1, 6.0), Trend::Rising),
    Row::new(Interval::closed_open(6.0, 10.0), Trend::RisingFast),
    Row::new(Interval::at_least(10.0), Trend::RisingVeryFast),
];

static TREND_BANDS: RangeTable<Trend> = RangeTable::new(&TREND_ROWS);

/// Outcome of one history insertion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    /// True when a reading from three hours ago existed
    pub valid: bool,
    /// `latest - three_hours_ago`, zero when not valid
    pub change_hpa: f64,
    /// Trend of the change, `Unknown` when not valid
    pub trend: Trend,
}

/// Fixed-depth pressure history
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BarometerHistory {
    slots: [f64; HISTORY_DEPTH],
}

impl BarometerHistory {
    /// Empty history
    pub const fn new() -> Self {
        Self { slots: [0.0; HISTORY_DEPTH] }
    }

    /// Shift in a new reading and compare with the one from three hours ago
    pub fn insert(&mut self, latest_hpa: f64) -> Insertion {
        let three_hours_ago = self.slots[HISTORY_DEPTH - 1];
        self.slots.copy_within(0..HISTORY_DEPTH - 1, 1);
        self.slots[0] = latest_hpa;

        if three_hours_ago != 0.0 {
            let change_hpa = latest_hpa - three_hours_ago;
            Insertion { valid: true, change_hpa, trend: Trend::from_change(change_hpa) }
        } else {
            Insertion { valid: false, change_hpa: 0.0, trend: Trend::Unknown }
        }
    }

    /// Slots, most recent first
    pub fn slots(&self) -> &[f64; HISTORY_DEPTH] {
        &self.slots
    }

    /// Most recent reading, `None` before the first insertion
    pub fn latest(&self) -> Option<f64> {
        match self.slots[0] {
            v if v != 0.0 => Some(v),
            _ => None,
        }
    }
}
