//! Property tests for the numeric building blocks
//!
//! Host-only: proptest needs `std`.

#![cfg(test)]

use enviromon_core::aqi::AqiThresholds;
use enviromon_core::barometer::HISTORY_DEPTH;
use enviromon_core::gas::GasChannel;
use enviromon_core::window::RollingWindow;
use enviromon_core::{
    AirQualityClassifier, AqiFactor, BarometerHistory, BarometricAltitudeCompensator, ClimateCompensator,
    GasCompensationEngine,
};
use proptest::prelude::*;

// ── Climate ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn corrected_humidity_never_exceeds_100(raw in -20.0f64..200.0, cover in any::<bool>()) {
        let compensator = ClimateCompensator::new(cover, 0.0);
        prop_assert!(compensator.correct_humidity(raw) <= 100.0);
    }

    #[test]
    fn temperature_correction_is_deterministic(raw in -40.0f64..85.0, offset in -5.0f64..5.0, cover in any::<bool>()) {
        let compensator = ClimateCompensator::new(cover, offset);
        let first = compensator.correct_temperature(raw);
        prop_assert!(first.is_finite());
        prop_assert_eq!(first.to_bits(), compensator.correct_temperature(raw).to_bits());
    }

    #[test]
    fn temperature_offset_shifts_output(raw in -40.0f64..85.0, offset in -5.0f64..5.0) {
        let plain = ClimateCompensator::new(false, 0.0).correct_temperature(raw);
        let shifted = ClimateCompensator::new(false, offset).correct_temperature(raw);
        prop_assert!((shifted - plain - offset).abs() < 1e-9);
    }
}

// ── Barometer ───────────────────────────────────────────────

proptest! {
    #[test]
    fn sea_level_factor_is_one(temp in -40.0f64..60.0) {
        let factor = BarometricAltitudeCompensator::new(0.0).compensation_factor(temp);
        prop_assert!((factor - 1.0).abs() < 1e-12);
    }

    #[test]
    fn station_above_sea_level_reads_higher(altitude in 1.0f64..2000.0, temp in -30.0f64..45.0, raw in 700.0f64..1050.0) {
        let compensator = BarometricAltitudeCompensator::new(altitude);
        let sea_level = compensator.correct(raw, temp);
        prop_assert!(sea_level > raw);
        prop_assert!((compensator.remove(sea_level, temp) - raw).abs() < 1e-6);
    }

    #[test]
    fn history_becomes_valid_on_tenth_insertion(readings in proptest::collection::vec(950.0f64..1050.0, 12)) {
        let mut history = BarometerHistory::new();
        for (i, reading) in readings.iter().enumerate() {
            let insertion = history.insert(*reading);
            prop_assert_eq!(insertion.valid, i >= HISTORY_DEPTH);
            if insertion.valid {
                prop_assert!((insertion.change_hpa - (reading - readings[i - HISTORY_DEPTH])).abs() < 1e-9);
            }
        }
    }
}

// ── Gas ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn ppm_is_positive_for_any_resistance(comp_rs in -1.0e6f64..1.0e7, r0 in 1.0f64..1.0e7) {
        let engine = GasCompensationEngine::new();
        for channel in GasChannel::ALL {
            let ppm = engine.resistance_to_ppm(channel, comp_rs, r0);
            prop_assert!(ppm.is_finite());
            prop_assert!(ppm > 0.0);
        }
    }

    #[test]
    fn rolling_window_mean_stays_within_recent_values(values in proptest::collection::vec(0.0f64..1.0e6, 1..30)) {
        let mut window: RollingWindow<7> = RollingWindow::new();
        for v in &values {
            window.push(*v);
        }
        prop_assert_eq!(window.len(), values.len().min(7));

        let recent = &values[values.len().saturating_sub(7)..];
        let lo = recent.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = recent.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = window.mean().unwrap();
        prop_assert!(mean >= lo - 1e-6 && mean <= hi + 1e-6);
    }
}

// ── Air quality ─────────────────────────────────────────────

proptest! {
    #[test]
    fn classification_reports_worst_factor(values in proptest::collection::vec(0.0f64..500.0, 6)) {
        let classifier = AirQualityClassifier::new(AqiThresholds::default());
        let readings: Vec<(AqiFactor, f64)> = AqiFactor::DEFAULT_ORDER.iter().copied().zip(values).collect();
        let worst = readings.iter().map(|(f, v)| classifier.level(*f, *v)).max().unwrap();

        let result = classifier.classify(&readings);
        prop_assert!(result.level_index() <= 4);
        prop_assert_eq!(result.level_index(), worst);
        prop_assert_eq!(result.factor.is_none(), worst == 0);
    }
}
