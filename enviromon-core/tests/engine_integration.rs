//! Integration tests for the cycle orchestrator
//!
//! Drives a full [`Engine`] through simulated hours and days with scripted
//! sensors and checks the lifecycle events: warm-up, daily recalibration,
//! external feed fallback, snapshot restore and the first forecast.

#![cfg(test)]

mod common;

use enviromon_core::gas::GasChannel;
use enviromon_core::traits::{MemoryStore, SnapshotStore};
use enviromon_core::utils::round_to;
use enviromon_core::{
    ClimateCompensator, Engine, EngineConfig, EngineError, ExternalUpdate, Forecast, GasRawTriplet, SensorError,
    Source,
};

use common::{assert_close, Rig, MS_PER_HOUR, ROOM_AIR};

const SHORT: u64 = 150_000;
const BAROMETER: u64 = 1_200_000;

#[test]
fn warmup_transition_happens_exactly_once() {
    let mut rig = Rig::new();
    let mut engine = rig.start(EngineConfig::default());

    let before = rig.drive(&mut engine, 0, 6_000_000, SHORT);
    assert!(before.iter().all(|(_, r)| !r.warmed_up));
    assert!(!engine.state().gas.is_warm());

    // The triplet read at the transition becomes R0
    rig.gas.triplet = GasRawTriplet::new(180_000.0, 25_000.0, 90_000.0);
    let report = rig.tick(&mut engine, 6_150_000).unwrap();
    assert!(report.warmed_up);

    let baseline = engine.state().gas.baseline();
    assert_eq!(baseline.red_r0, 180_000.0);
    assert_eq!(baseline.oxi_r0, 25_000.0);
    assert_eq!(baseline.nh3_r0, 90_000.0);
    assert_eq!(baseline.calib_temp, ROOM_AIR.temperature_c);
    assert_eq!(baseline.calib_bar, ROOM_AIR.pressure_hpa);

    let after = rig.drive(&mut engine, 6_300_000, 8 * MS_PER_HOUR, SHORT);
    assert!(after.iter().all(|(_, r)| !r.warmed_up));
}

#[test]
fn warm_gas_at_baseline_reports_curve_intercept() {
    let mut rig = Rig::new();
    let mut engine = rig.start(EngineConfig::default().with_warmup_ms(600_000));
    rig.drive(&mut engine, 0, 750_000, SHORT);
    assert!(engine.state().gas.is_warm());

    let report = rig.tick(&mut engine, 900_000).unwrap();
    let gas = report.gas.unwrap();
    assert!(gas.calibrated);
    // Rs == R0 in unchanged air, so ppm = 10^intercept
    let (_, intercept) = GasChannel::Reducing.curve();
    assert_close(gas.red_ppm, 10f64.powf(intercept), 0.01);
}

#[test]
fn daily_recalibration_runs_once_per_day() {
    let mut rig = Rig::new().starting_at_hour(0);
    let mut engine = rig.start(EngineConfig::default().with_warmup_ms(600_000));
    rig.drive(&mut engine, 0, 750_000, SHORT);
    assert!(engine.state().gas.is_warm());
    assert_eq!(engine.state().gas.baseline().red_r0, 210_000.0);

    rig.gas.triplet = GasRawTriplet::new(140_000.0, 20_000.0, 80_000.0);
    let reports = rig.drive(&mut engine, 900_000, 100_000_000, SHORT);
    let recalibrated: Vec<u64> = reports.iter().filter(|(_, r)| r.recalibrated).map(|(t, _)| *t).collect();

    // 03:00 on day one and day two
    assert_eq!(recalibrated, vec![3 * MS_PER_HOUR, 27 * MS_PER_HOUR]);

    // Six seeded 210k days and two 140k days
    let baseline = engine.state().gas.baseline();
    assert_eq!(baseline.red_r0, 190_000.0);
    assert_eq!(baseline.oxi_r0, 20_000.0);
    assert_eq!(engine.state().gas.history().red_r0.len(), 7);
}

#[test]
fn first_daily_recalibration_averages_into_seeded_history() {
    let mut rig = Rig::new().starting_at_hour(0);
    let mut engine = rig.start(EngineConfig::default().with_warmup_ms(600_000));
    rig.drive(&mut engine, 0, 750_000, SHORT);

    rig.gas.triplet = GasRawTriplet::new(140_000.0, 20_000.0, 80_000.0);
    rig.drive(&mut engine, 900_000, 3 * MS_PER_HOUR, SHORT);
    assert!(engine.state().gas.daily_completed());
    assert_eq!(engine.state().gas.baseline().red_r0, 200_000.0);

    // The flag clears at 04:00
    rig.drive(&mut engine, 3 * MS_PER_HOUR + SHORT, 4 * MS_PER_HOUR, SHORT);
    assert!(!engine.state().gas.daily_completed());
}

#[test]
fn external_feed_wins_until_stale() {
    let mut rig = Rig::new();
    let mut engine = rig.start(EngineConfig::default());
    let first = rig.tick(&mut engine, 0).unwrap().climate.unwrap();
    assert_eq!(first.temp_humidity_source, Source::Local);

    engine.receive_external_feed(
        ExternalUpdate::TemperatureHumidity { temperature_c: 18.3, humidity_pct: 61.0 },
        100_000,
    );
    engine.receive_external_feed(ExternalUpdate::Barometer(1013.7), 100_000);

    let external = rig.tick(&mut engine, SHORT).unwrap().climate.unwrap();
    assert_eq!(external.temp_humidity_source, Source::External);
    assert_eq!(external.barometer_source, Source::External);
    assert_eq!(external.temperature_c, 18.3);
    assert_eq!(external.humidity_pct, 61.0);
    assert_eq!(external.pressure_hpa, 1013.7);
    // Sea-level station: nothing to remove
    assert_close(external.upstream_pressure_pa, 101_370.0, 1e-6);

    let still = rig.tick(&mut engine, 2 * SHORT).unwrap().climate.unwrap();
    assert_eq!(still.temp_humidity_source, Source::External);

    // 500 s after the update the feed no longer counts
    let stale = rig.tick(&mut engine, 600_000).unwrap().climate.unwrap();
    assert_eq!(stale.temp_humidity_source, Source::Local);
    assert_eq!(stale.barometer_source, Source::Local);
    let expected = round_to(ClimateCompensator::new(false, 0.0).correct_temperature(ROOM_AIR.temperature_c), 1);
    assert_eq!(stale.temperature_c, expected);
    assert_close(stale.upstream_pressure_pa, ROOM_AIR.pressure_hpa * 100.0, 1e-9);
}

#[test]
fn diagnostic_reports_real_values_only_for_external_sources() {
    let mut rig = Rig::new();
    let mut engine = rig.start(EngineConfig::default());
    rig.drive(&mut engine, 0, 300_000, SHORT);

    engine.receive_external_feed(
        ExternalUpdate::TemperatureHumidity { temperature_c: 19.0, humidity_pct: 55.0 },
        440_000,
    );
    let report = rig.tick(&mut engine, 450_000).unwrap();
    let diagnostic = report.diagnostic.unwrap();
    assert_eq!(diagnostic.real_temp, Some(19.0));
    assert_eq!(diagnostic.real_hum, Some(55.0));
    assert_eq!(diagnostic.real_bar, None);
    assert!(diagnostic.output_bar.is_some());
    assert_eq!(diagnostic.run_time_s, 450);
}

#[test]
fn young_snapshot_is_restored() {
    let mut rig = Rig::new();
    let mut engine = rig.start(EngineConfig::default());
    let reports = rig.drive(&mut engine, 0, 450_000, SHORT);
    let snapshot = reports.last().and_then(|(_, r)| r.snapshot.clone()).unwrap();
    assert_eq!(snapshot.updated_at, 450_000);
    assert!(snapshot.state.max_temp.is_some());

    let mut store = MemoryStore::new();
    store.save(&snapshot).unwrap();

    let mut fresh = Rig::new();
    let restart = 510_000;
    let mut restored =
        Engine::start_from_store(EngineConfig::default(), restart, &mut fresh.sensors(), &mut store).unwrap();
    assert_eq!(restored.state(), &snapshot.state);

    // Cadences resume from the snapshot rather than firing on the first tick
    let report = restored.tick(restart, 12, &mut fresh.sensors()).unwrap();
    assert!(report.climate.is_none());
}

#[test]
fn old_snapshot_falls_back_to_defaults() {
    let mut rig = Rig::new();
    let mut engine = rig.start(EngineConfig::default());
    rig.drive(&mut engine, 0, 450_000, SHORT);
    let snapshot = engine.snapshot(450_000);

    let mut fresh = Rig::new();
    let restart = 450_000 + 1_200_000;
    let restored = Engine::restore(EngineConfig::default(), restart, &mut fresh.sensors(), Some(snapshot)).unwrap();
    assert_eq!(restored.state().max_temp, None);
    assert_eq!(restored.state().forecast.forecast, Forecast::InsufficientData);
    assert!(!restored.state().gas.is_warm());
}

#[test]
fn empty_store_starts_with_defaults() {
    let mut rig = Rig::new();
    let mut store = MemoryStore::new();
    let engine = Engine::start_from_store(EngineConfig::default(), 0, &mut rig.sensors(), &mut store).unwrap();
    assert!(store.is_empty());
    assert_eq!(engine.state().min_temp, None);
}

#[test]
fn first_forecast_needs_three_hours_of_history() {
    let mut rig = Rig::new();
    let mut engine = rig.start(EngineConfig::default());

    let mut now = 0;
    while now <= 3 * MS_PER_HOUR {
        // Falls 0.5 hPa every barometer interval
        rig.climate.sample.pressure_hpa = 1012.0 - 0.5 * (now / BAROMETER) as f64;
        let report = rig.tick(&mut engine, now).unwrap();
        if report.barometer_logged && now < 9 * BAROMETER {
            assert!(!engine.forecast().valid);
            assert_eq!(engine.forecast().forecast, Forecast::InsufficientData);
        }
        now += SHORT;
    }

    let forecast = engine.forecast();
    assert!(forecast.valid);
    assert_close(forecast.change_hpa, -4.5, 1e-9);
    assert_eq!(forecast.forecast, Forecast::classify(1007.5, -4.5));
    assert_eq!(forecast.available_at, 3 * MS_PER_HOUR);
}

#[test]
fn gas_sensor_gets_one_reset_before_failing_the_tick() {
    let mut rig = Rig::new();
    let mut engine = rig.start(EngineConfig::default());
    rig.tick(&mut engine, 0).unwrap();

    rig.gas.fail_next = 1;
    assert!(rig.tick(&mut engine, SHORT).is_ok());
    assert_eq!(rig.gas.resets, 1);

    rig.gas.fail_next = 2;
    let err = rig.tick(&mut engine, 2 * SHORT).unwrap_err();
    assert_eq!(err, EngineError::SensorRead { sensor: "gas", cause: SensorError::Timeout });
    assert_eq!(rig.gas.resets, 2);
}

#[test]
fn particulate_failure_after_reset_aborts_tick() {
    let mut rig = Rig::new();
    let mut engine = rig.start(EngineConfig::default());
    rig.pm.fail_next = 2;
    let err = rig.tick(&mut engine, 0).unwrap_err();
    assert!(matches!(err, EngineError::SensorRead { sensor: "particulate", .. }));
}

#[test]
fn invalid_configuration_is_refused() {
    let mut rig = Rig::new();
    let config = EngineConfig::default().with_calibration_hour(24);
    let result = Engine::start(config, 0, &mut rig.sensors());
    assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
}
