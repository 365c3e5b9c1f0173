//! Short-Range Weather Forecast from Barometric Tendency
//!
//! ## Method
//!
//! The classic "law of storms" rule set: absolute sea-level pressure picks a
//! band, and the 3-hour pressure change within that band picks a forecast.
//! There is no learning and no state; the same inputs always give the same
//! forecast.
//!
//! ```text
//!            < 1009       1009..=1018      (1018, 1023]     > 1023
//!           ┌─────────┬────────────────┬───────────────┬──────────────┐
//!  change ► │ 6 rows  │ 6 rows         │ 7 rows        │ 7 rows       │
//!           └─────────┴────────────────┴───────────────┴──────────────┘
//! ```
//!
//! The middle band has one row that also depends on pressure (`p <= 1015`
//! versus `p > 1015`); it is split into two sub-bands so every table is keyed
//! on a single number. Each table ends in an "otherwise" row.
//!
//! ## Output Codes
//!
//! Every forecast carries an icon tag for the local display, a numeric
//! home-automation forecast code and a dashboard icon name. They are part of
//! the wire format of existing integrations and must not change.

use crate::barometer::Trend;
use crate::table::{Interval, RangeTable, Row};
use crate::time::Timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Forecast category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Forecast {
    /// Less than three hours of history
    #[default]
    InsufficientData,
    /// Clearing and colder
    ClearingAndColder,
    /// Strong wind warning
    StrongWindWarning,
    /// Gale warning
    GaleWarning,
    /// Rain and wind
    RainAndWind,
    /// Storm
    Storm,
    /// Storm and gale
    StormAndGale,
    /// No change
    NoChange,
    /// Poorer weather
    PoorerWeather,
    /// Fair weather with slight temperature change
    FairSlightTempChange,
    /// No change but rain in 24 hours
    NoChangeRainIn24Hours,
    /// Rain, wind and higher temperature
    RainWindHigherTemp,
    /// Fair weather
    FairWeather,
    /// Fair weather with little temperature change
    FairLittleTempChange,
    /// Fair weather and slowly rising temperature
    FairSlowlyRisingTemp,
    /// Warming trend
    WarmingTrend,
}

impl Forecast {
    /// Display text, may contain line breaks
    pub fn text(self) -> &'static str {
        match self {
            Self::InsufficientData => "Insufficient Data",
            Self::ClearingAndColder => "Clearing and Colder",
            Self::StrongWindWarning => "Strong Wind Warning",
            Self::GaleWarning => "Gale Warning",
            Self::RainAndWind => "Rain and Wind",
            Self::Storm => "Storm",
            Self::StormAndGale => "Storm and Gale",
            Self::NoChange => "No Change",
            Self::PoorerWeather => "Poorer Weather",
            Self::FairSlightTempChange => "Fair Weather with\nSlight Temp Change",
            Self::NoChangeRainIn24Hours => "No Change but\nRain in 24 Hours",
            Self::RainWindHigherTemp => "Rain, Wind and\n Higher Temp",
            Self::FairWeather => "Fair Weather",
            Self::FairLittleTempChange => "Fair Weather with\nLittle Temp Change",
            Self::FairSlowlyRisingTemp => "Fair Weather and\nSlowly Rising Temp",
            Self::WarmingTrend => "Warming Trend",
        }
    }

    /// Icon tag for the local display
    pub fn icon(self) -> &'static str {
        match self {
            Self::InsufficientData => "Wait",
            Self::ClearingAndColder
            | Self::FairSlightTempChange
            | Self::FairWeather
            | Self::FairLittleTempChange
            | Self::FairSlowlyRisingTemp
            | Self::WarmingTrend => "Fair",
            Self::StrongWindWarning => "Windy",
            Self::GaleWarning | Self::StormAndGale => "Gale",
            Self::RainAndWind | Self::RainWindHigherTemp => "Rain",
            Self::Storm => "Storm",
            Self::NoChange | Self::NoChangeRainIn24Hours => "Stable",
            Self::PoorerWeather => "Poorer",
        }
    }

    /// Home-automation forecast code, `"0"` to `"4"`
    pub fn home_automation_code(self) -> &'static str {
        match self {
            Self::InsufficientData | Self::NoChange | Self::NoChangeRainIn24Hours => "0",
            Self::ClearingAndColder
            | Self::FairSlightTempChange
            | Self::FairWeather
            | Self::FairLittleTempChange
            | Self::FairSlowlyRisingTemp
            | Self::WarmingTrend => "1",
            Self::StrongWindWarning | Self::PoorerWeather => "3",
            Self::GaleWarning
            | Self::RainAndWind
            | Self::Storm
            | Self::StormAndGale
            | Self::RainWindHigherTemp => "4",
        }
    }

    /// Dashboard icon name
    pub fn dashboard_icon(self) -> &'static str {
        match self {
            Self::InsufficientData => "question",
            Self::ClearingAndColder => "thermometer-quarter",
            Self::StrongWindWarning => "w:wind-beaufort-7",
            Self::GaleWarning => "w:wind-beaufort-9",
            Self::RainAndWind | Self::RainWindHigherTemp => "w:rain-wind",
            Self::Storm | Self::StormAndGale => "w:thunderstorm",
            Self::NoChange | Self::NoChangeRainIn24Hours => "balance-scale",
            Self::PoorerWeather => "w:cloud",
            Self::FairSlightTempChange
            | Self::FairWeather
            | Self::FairLittleTempChange
            | Self::FairSlowlyRisingTemp => "w:day-sunny",
            Self::WarmingTrend => "thermometer-three-quarters",
        }
    }

    /// Single-line text for telemetry
    #[cfg(feature = "std")]
    pub fn single_line_text(self) -> std::string::String {
        self.text().replace('\n', " ")
    }

    /// Forecast for sea-level pressure and its 3-hour change
    pub fn classify(pressure_hpa: f64, change_hpa: f64) -> Self {
        let band = PRESSURE_BANDS.classify(pressure_hpa).unwrap_or(PressureBand::High);
        band.rules().classify(change_hpa).unwrap_or(band.otherwise())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressureBand {
    Low,
    NormalLower,
    NormalUpper,
    Raised,
    High,
}

impl PressureBand {
    fn rules(self) -> &'static RangeTable<Forecast> {
        match self {
            Self::Low => &LOW,
            Self::NormalLower => &NORMAL_LOWER,
            Self::NormalUpper => &NORMAL_UPPER,
            Self::Raised => &RAISED,
            Self::High => &HIGH,
        }
    }

    fn otherwise(self) -> Forecast {
        match self {
            Self::Low => Forecast::StormAndGale,
            Self::NormalLower | Self::NormalUpper => Forecast::RainAndWind,
            Self::Raised => Forecast::RainWindHigherTemp,
            Self::High => Forecast::WarmingTrend,
        }
    }
}

static PRESSURE_BAND_ROWS: [Row<PressureBand>; 5] = [
    Row::new(Interval::below(1009.0), PressureBand::Low),
    Row::new(Interval::closed(1009.0, 1015.0), PressureBand::NormalLower),
    Row::new(Interval::open_closed(1015.0, 1018.0), PressureBand::NormalUpper),
    Row::new(Interval::open_closed(1018.0, 1023.0), PressureBand::Raised),
    Row::new(Interval::ALL, PressureBand::High),
];

static PRESSURE_BANDS: RangeTable<PressureBand> = RangeTable::new(&PRESSURE_BAND_ROWS);

static LOW_ROWS: [Row<Forecast>; 6] = [
    Row::new(Interval::open(-1.1, 6.0), Forecast::ClearingAndColder),
    Row::new(Interval::closed_open(6.0, 10.0), Forecast::StrongWindWarning),
    Row::new(Interval::at_least(10.0), Forecast::GaleWarning),
    Row::new(Interval::closed(-4.0, -1.1), Forecast::RainAndWind),
    Row::new(Interval::open(-10.0, -4.0), Forecast::Storm),
    Row::new(Interval::ALL, Forecast::StormAndGale),
];

// [1009, 1015]: a moderate rise is still "No Change"
static NORMAL_LOWER_ROWS: [Row<Forecast>; 5] = [
    Row::new(Interval::open(-4.0, 1.1), Forecast::NoChange),
    Row::new(Interval::closed(1.1, 6.0), Forecast::NoChange),
    Row::new(Interval::closed_open(6.0, 10.0), Forecast::StrongWindWarning),
    Row::new(Interval::at_least(10.0), Forecast::GaleWarning),
    Row::new(Interval::ALL, Forecast::RainAndWind),
];

// (1015, 1018]
static NORMAL_UPPER_ROWS: [Row<Forecast>; 5] = [
    Row::new(Interval::open(-4.0, 1.1), Forecast::NoChange),
    Row::new(Interval::closed(1.1, 6.0), Forecast::PoorerWeather),
    Row::new(Interval::closed_open(6.0, 10.0), Forecast::StrongWindWarning),
    Row::new(Interval::at_least(10.0), Forecast::GaleWarning),
    Row::new(Interval::ALL, Forecast::RainAndWind),
];

static RAISED_ROWS: [Row<Forecast>; 7] = [
    Row::new(Interval::open(0.0, 1.1), Forecast::NoChange),
    Row::new(Interval::closed_open(1.1, 6.0), Forecast::PoorerWeather),
    Row::new(Interval::closed_open(6.0, 10.0), Forecast::StrongWindWarning),
    Row::new(Interval::at_least(10.0), Forecast::GaleWarning),
    Row::new(Interval::open_closed(-1.1, 0.0), Forecast::FairSlightTempChange),
    Row::new(Interval::open_closed(-4.0, -1.1), Forecast::NoChangeRainIn24Hours),
    Row::new(Interval::ALL, Forecast::RainWindHigherTemp),
];

static HIGH_ROWS: [Row<Forecast>; 7] = [
    Row::new(Interval::open(0.0, 1.1), Forecast::FairWeather),
    Row::new(Interval::open_closed(-1.1, 0.0), Forecast::FairLittleTempChange),
    Row::new(Interval::closed_open(1.1, 6.0), Forecast::PoorerWeather),
    Row::new(Interval::closed_open(6.0, 10.0), Forecast::StrongWindWarning),
    Row::new(Interval::at_least(10.0), Forecast::GaleWarning),
    Row::new(Interval::open_closed(-4.0, -1.1), Forecast::FairSlowlyRisingTemp),
    Row::new(Interval::ALL, Forecast::WarmingTrend),
];

static LOW: RangeTable<Forecast> = RangeTable::new(&LOW_ROWS);
static NORMAL_LOWER: RangeTable<Forecast> = RangeTable::new(&NORMAL_LOWER_ROWS);
static NORMAL_UPPER: RangeTable<Forecast> = RangeTable::new(&NORMAL_UPPER_ROWS);
static RAISED: RangeTable<Forecast> = RangeTable::new(&RAISED_ROWS);
static HIGH: RangeTable<Forecast> = RangeTable::new(&HIGH_ROWS);

/// Forecast together with the tendency it was derived from
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForecastResult {
    /// Forecast category
    pub forecast: Forecast,
    /// Pressure trend
    pub trend: Trend,
    /// 3-hour change in hPa, zero while not valid
    pub change_hpa: f64,
    /// True once three hours of history exist
    pub valid: bool,
    /// When a forecast is (or became) available
    pub available_at: Timestamp,
}

impl ForecastResult {
    /// Placeholder result before enough history exists
    pub const fn insufficient(available_at: Timestamp) -> Self {
        Self {
            forecast: Forecast::InsufficientData,
            trend: Trend::Unknown,
            change_hpa: 0.0,
            valid: false,
            available_at,
        }
    }

    /// Display text
    pub fn text(&self) -> &'static str {
        self.forecast.text()
    }

    /// Icon tag
    pub fn icon(&self) -> &'static str {
        self.forecast.icon()
    }

    /// Home-automation forecast code
    pub fn home_automation_code(&self) -> &'static str {
        self.forecast.home_automation_code()
    }

    /// Dashboard icon name
    pub fn dashboard_icon(&self) -> &'static str {
        self.forecast.dashboard_icon()
    }

    /// Trend symbol, empty while not valid
    pub fn trend_symbol(&self) -> &'static str {
        self.trend.symbol()
    }
}
