//! Overall air-quality level
//!
//! Each measured factor has its own ladder of four ascending cut points. A
//! factor's level is the number of cut points its reading strictly exceeds,
//! so 0 is best and 4 is worst. The overall result is the factor with the
//! highest level; on a tie the factor listed first wins, which makes the
//! caller's ordering part of the contract.
//!
//! Gas factors are excluded while the gas sensor is Cold because their
//! readings are uncalibrated.

use heapless::Vec;

use crate::constants::aqi::{
    AQI_LEVEL_COUNT, NH3_LADDER, OXI_LADDER, PM10_LADDER, PM1_LADDER, PM2_5_LADDER, RED_LADDER,
};
use crate::errors::{EngineError, EngineResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of air-quality factors
pub const FACTOR_COUNT: usize = 6;

/// Measured quantity contributing to the air-quality level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AqiFactor {
    /// PM1.0
    Pm1,
    /// PM2.5
    Pm2_5,
    /// PM10
    Pm10,
    /// Oxidising gases
    Oxi,
    /// Reducing gases
    Red,
    /// Ammonia
    Nh3,
}

impl AqiFactor {
    /// Default priority order, particulates first
    pub const DEFAULT_ORDER: [AqiFactor; FACTOR_COUNT] = [
        AqiFactor::Pm1,
        AqiFactor::Pm2_5,
        AqiFactor::Pm10,
        AqiFactor::Oxi,
        AqiFactor::Red,
        AqiFactor::Nh3,
    ];

    /// Display name, also the telemetry key
    pub fn name(self) -> &'static str {
        match self {
            Self::Pm1 => "P1",
            Self::Pm2_5 => "P2.5",
            Self::Pm10 => "P10",
            Self::Oxi => "Oxi",
            Self::Red => "Red",
            Self::Nh3 => "NH3",
        }
    }

    /// True for the three gas channels
    pub fn is_gas(self) -> bool {
        matches!(self, Self::Oxi | Self::Red | Self::Nh3)
    }
}

/// Severity level names, index = level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AqiLevel {
    /// Level 0
    #[default]
    Great,
    /// Level 1
    Ok,
    /// Level 2
    Alert,
    /// Level 3
    Poor,
    /// Level 4
    Bad,
}

impl AqiLevel {
    /// Level from its number, saturating at `Bad`
    pub fn from_index(level: u8) -> Self {
        match level {
            0 => Self::Great,
            1 => Self::Ok,
            2 => Self::Alert,
            3 => Self::Poor,
            _ => Self::Bad,
        }
    }

    /// Numeric level, 0 best
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Great => "Great",
            Self::Ok => "OK",
            Self::Alert => "Alert",
            Self::Poor => "Poor",
            Self::Bad => "Bad",
        }
    }
}

/// Threshold ladders for every factor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AqiThresholds {
    /// PM1.0 ladder (µg/m³)
    pub pm1: [f64; AQI_LEVEL_COUNT],
    /// PM2.5 ladder (µg/m³)
    pub pm2_5: [f64; AQI_LEVEL_COUNT],
    /// PM10 ladder (µg/m³)
    pub pm10: [f64; AQI_LEVEL_COUNT],
    /// Oxidising ladder (ppm)
    pub oxi: [f64; AQI_LEVEL_COUNT],
    /// Reducing ladder (ppm)
    pub red: [f64; AQI_LEVEL_COUNT],
    /// Ammonia ladder (ppm)
    pub nh3: [f64; AQI_LEVEL_COUNT],
}

impl Default for AqiThresholds {
    fn default() -> Self {
        Self {
            pm1: PM1_LADDER,
            pm2_5: PM2_5_LADDER,
            pm10: PM10_LADDER,
            oxi: OXI_LADDER,
            red: RED_LADDER,
            nh3: NH3_LADDER,
        }
    }
}

impl AqiThresholds {
    /// Ladder of one factor
    pub fn ladder(&self, factor: AqiFactor) -> &[f64; AQI_LEVEL_COUNT] {
        match factor {
            AqiFactor::Pm1 => &self.pm1,
            AqiFactor::Pm2_5 => &self.pm2_5,
            AqiFactor::Pm10 => &self.pm10,
            AqiFactor::Oxi => &self.oxi,
            AqiFactor::Red => &self.red,
            AqiFactor::Nh3 => &self.nh3,
        }
    }

    /// Reject ladders that are not strictly ascending or not finite
    pub fn validate(&self) -> EngineResult<()> {
        for factor in AqiFactor::DEFAULT_ORDER {
            let ladder = self.ladder(factor);
            if ladder.iter().any(|t| !t.is_finite()) {
                return Err(EngineError::InvalidConfig { reason: "threshold ladder contains a non-finite value" });
            }
            if ladder.windows(2).any(|w| w[0] >= w[1]) {
                return Err(EngineError::InvalidConfig { reason: "threshold ladder is not strictly ascending" });
            }
        }
        Ok(())
    }
}

/// Worst factor and its level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AqiResult {
    /// Worst factor, `None` when nothing exceeds level 0
    pub factor: Option<AqiFactor>,
    /// Level of that factor
    pub level: AqiLevel,
}

impl AqiResult {
    /// Factor name, `"All"` when every factor is at level 0
    pub fn factor_name(&self) -> &'static str {
        self.factor.map_or("All", AqiFactor::name)
    }

    /// Numeric level, 0 best
    pub fn level_index(&self) -> u8 {
        self.level.index()
    }
}

/// Picks the worst-offending factor across the measured quantities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirQualityClassifier {
    thresholds: AqiThresholds,
}

impl Default for AirQualityClassifier {
    fn default() -> Self {
        Self::new(AqiThresholds::default())
    }
}

impl AirQualityClassifier {
    /// Classifier over the given ladders
    pub const fn new(thresholds: AqiThresholds) -> Self {
        Self { thresholds }
    }

    /// Active ladders
    pub fn thresholds(&self) -> &AqiThresholds {
        &self.thresholds
    }

    /// Level of a single reading against a factor's ladder
    pub fn level(&self, factor: AqiFactor, value: f64) -> u8 {
        // Count of cut points strictly exceeded; NaN exceeds none
        self.thresholds.ladder(factor).iter().filter(|&&t| value > t).count() as u8
    }

    /// Worst factor over `(factor, value)` pairs in priority order
    ///
    /// Ties keep the earlier factor. With no readings, or all at level 0,
    /// the result is `("All", Great)`.
    pub fn classify(&self, factors: &[(AqiFactor, f64)]) -> AqiResult {
        let mut best = AqiResult::default();
        for &(factor, value) in factors {
            let level = self.level(factor, value);
            if level > best.level.index() {
                best = AqiResult { factor: Some(factor), level: AqiLevel::from_index(level) };
            }
        }
        best
    }

    /// Factors to consider given the gas sensor state, in default order
    pub fn active_factors(gas_warm: bool) -> Vec<AqiFactor, FACTOR_COUNT> {
        AqiFactor::DEFAULT_ORDER
            .iter()
            .copied()
            .filter(|f| gas_warm || !f.is_gas())
            .collect()
    }
}
