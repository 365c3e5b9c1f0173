//! Cycle Orchestrator
//!
//! ## Overview
//!
//! [`Engine`] owns the configuration, the source arbiter and the one
//! [`EngineState`], and advances them with a cooperative [`Engine::tick`]
//! called by the host loop roughly twice a second. Three cadences run inside
//! a tick:
//!
//! ```text
//! every tick          particulates
//! every 150 s         climate + gas (arbitrate, compensate, ppm)
//! every 20 min        barometer history + forecast   (after first climate)
//! every 300 s         telemetry + snapshot           (after 300 s settling)
//! then                warm-up check, daily recalibration check
//! ```
//!
//! ## Timing
//!
//! The engine never reads a clock. `now` and the local hour are arguments,
//! so a test can drive a week of operation in microseconds. A cadence fires
//! when at least its interval has passed since it last fired; a cadence that
//! never fired is due immediately.
//!
//! ## Failure Policy
//!
//! A sensor that fails twice (before and after a reset) aborts the tick with
//! [`EngineError::SensorRead`](crate::EngineError::SensorRead). Everything else (stale feeds, non-positive
//! gas ratios, bad snapshots) degrades gracefully.

use heapless::Vec;

use crate::aqi::{AirQualityClassifier, AqiFactor, AqiResult, FACTOR_COUNT};
use crate::arbiter::{ExternalSourceArbiter, ExternalUpdate, Source};
use crate::compensation::{BarometricAltitudeCompensator, ClimateCompensator, CompensatedClimate};
use crate::config::EngineConfig;
use crate::constants::physics::PA_PER_HPA;
use crate::constants::time::{FORECAST_LEAD_MS, MS_PER_SECOND};
use crate::errors::EngineResult;
use crate::forecast::{Forecast, ForecastResult};
use crate::gas::{GasCalibrationManager, GasConcentrations};
use crate::records::{code, DiagnosticRecord, TelemetryForecast, TelemetryRecord};
use crate::sensors::{ParticulateSample, RawClimateSample, Sensors};
use crate::state::{EngineState, Snapshot};
use crate::time::{elapsed_ms, Timestamp};
use crate::traits::SnapshotStore;
use crate::utils::round_to;

/// Everything produced by one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Particulates read this tick
    pub particulates: Option<ParticulateSample>,
    /// Compensated climate, when the short cadence ran
    pub climate: Option<CompensatedClimate>,
    /// Gas concentrations, when the short cadence ran
    pub gas: Option<GasConcentrations>,
    /// Barometer history advanced this tick
    pub barometer_logged: bool,
    /// Telemetry payload, when the long cadence ran
    pub telemetry: Option<TelemetryRecord>,
    /// Diagnostic log line, when the long cadence ran
    pub diagnostic: Option<DiagnosticRecord>,
    /// State to persist, when the long cadence ran
    pub snapshot: Option<Snapshot>,
    /// Gas sensor finished warming up this tick
    pub warmed_up: bool,
    /// Daily gas recalibration ran this tick
    pub recalibrated: bool,
}

/// Values of the latest short cycle that feed the long cadence
#[derive(Debug, Clone, Copy)]
struct CycleValues {
    raw: RawClimateSample,
    local_temp: f64,
    local_hum: f64,
    climate: CompensatedClimate,
    gas: GasConcentrations,
}

/// Calibration, compensation and forecasting engine
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    climate: ClimateCompensator,
    barometric: BarometricAltitudeCompensator,
    aqi: AirQualityClassifier,
    arbiter: ExternalSourceArbiter,
    state: EngineState,
    started_at: Timestamp,
    last_raw_climate: RawClimateSample,
    first_climate_done: bool,
    last_short_at: Option<Timestamp>,
    last_long_at: Option<Timestamp>,
    forecast_pending: bool,
    latest: Option<CycleValues>,
    latest_particulates: Option<ParticulateSample>,
}

impl Engine {
    /// Start with default state
    ///
    /// Takes one raw climate and one raw gas reading: the gas reading is the
    /// start-up R0 and the climate reading its reference point.
    pub fn start(config: EngineConfig, now: Timestamp, sensors: &mut Sensors<'_>) -> EngineResult<Self> {
        config.validate()?;
        let raw = sensors.read_climate()?;
        let r0 = sensors.read_gas()?;
        let gas = GasCalibrationManager::new(r0, raw, config.schedule());
        Ok(Self {
            climate: ClimateCompensator::new(config.weather_cover, config.temp_offset_c),
            barometric: BarometricAltitudeCompensator::new(config.altitude_m),
            aqi: AirQualityClassifier::new(config.thresholds),
            arbiter: ExternalSourceArbiter::new(),
            state: EngineState::new(gas, now),
            started_at: now,
            last_raw_climate: raw,
            first_climate_done: false,
            last_short_at: None,
            last_long_at: None,
            forecast_pending: true,
            latest: None,
            latest_particulates: None,
            config,
        })
    }

    /// Start, then adopt `snapshot` if it passes the acceptance check
    ///
    /// A rejected snapshot is logged and the engine keeps its default state.
    pub fn restore(
        config: EngineConfig,
        now: Timestamp,
        sensors: &mut Sensors<'_>,
        snapshot: Option<Snapshot>,
    ) -> EngineResult<Self> {
        let mut engine = Self::start(config, now, sensors)?;
        match snapshot {
            Some(snapshot) => match engine.adopt(snapshot) {
                Ok(()) => log_info!("Snapshot restored"),
                Err(err) => {
                    log_warn!("Snapshot ignored, using defaults: {}", err);
                    let _ = err;
                }
            },
            None => log_info!("No snapshot available, using defaults"),
        }
        Ok(engine)
    }

    /// Start from whatever `store` holds; a failing store means defaults
    pub fn start_from_store<S: SnapshotStore>(
        config: EngineConfig,
        now: Timestamp,
        sensors: &mut Sensors<'_>,
        store: &mut S,
    ) -> EngineResult<Self> {
        let snapshot = store.load().unwrap_or_else(|_| {
            log_warn!("Snapshot store unreadable, using defaults");
            None
        });
        Self::restore(config, now, sensors, snapshot)
    }

    fn adopt(&mut self, snapshot: Snapshot) -> EngineResult<()> {
        let updated_at = snapshot.updated_at;
        self.state = EngineState::restore(snapshot, self.started_at, self.config.schedule())?;
        // Cadences continue from the last persisted cycle
        self.last_short_at = Some(updated_at);
        self.last_long_at = Some(updated_at);
        Ok(())
    }

    /// Run one cooperative cycle
    pub fn tick(&mut self, now: Timestamp, hour_of_day: u8, sensors: &mut Sensors<'_>) -> EngineResult<TickReport> {
        let mut report = TickReport::default();

        if let Some(pm) = sensors.read_particulates()? {
            self.latest_particulates = Some(pm);
            report.particulates = Some(pm);
        }

        if is_due(self.last_short_at, now, self.config.cadences.short_ms) {
            self.last_short_at = Some(now);
            let cycle = self.short_cycle(now, sensors)?;
            report.climate = Some(cycle.climate);
            report.gas = Some(cycle.gas);
        }

        if self.first_climate_done && is_due(self.state.barometer_logged_at, now, self.config.cadences.barometer_ms) {
            if let Some(cycle) = self.latest {
                self.log_barometer(now, cycle.climate.pressure_hpa);
                report.barometer_logged = true;
            }
        }

        let run_time = elapsed_ms(self.started_at, now);
        if run_time > self.config.cadences.stabilisation_ms
            && is_due(self.last_long_at, now, self.config.cadences.long_ms)
        {
            self.last_long_at = Some(now);
            if let Some(cycle) = self.latest {
                report.telemetry = Some(self.telemetry(&cycle));
                report.diagnostic = Some(self.diagnostic(&cycle, run_time));
                self.forecast_pending = false;
            }
            report.snapshot = Some(self.state.snapshot(now));
        }

        if self.state.gas.warmup_due(run_time) {
            let fresh = sensors.read_gas()?;
            self.state.gas.complete_warmup(fresh, self.last_raw_climate);
            report.warmed_up = true;
        }

        if self.state.gas.daily_due(hour_of_day, self.first_climate_done) {
            let fresh = sensors.read_gas()?;
            self.state.gas.daily_recalibrate(fresh, self.last_raw_climate);
            report.recalibrated = true;
        }
        self.state.gas.update_daily_flag(hour_of_day);

        Ok(report)
    }

    fn short_cycle(&mut self, now: Timestamp, sensors: &mut Sensors<'_>) -> EngineResult<CycleValues> {
        let raw = sensors.read_climate()?;
        self.last_raw_climate = raw;

        let local_temp = self.climate.correct_temperature(raw.temperature_c);
        let local_hum = self.climate.correct_humidity(raw.humidity_pct);

        let (temperature_c, humidity_pct, temp_humidity_source) = match self.arbiter.select_temp_humidity(now) {
            Some((t, h)) => (t, h, Source::External),
            None => (round_to(local_temp, 1), round_to(local_hum, 1), Source::Local),
        };

        // Skip the very first reading of the process, the sensor is still settling
        if self.first_climate_done {
            self.state.record_temperature(temperature_c);
        }

        let factor_temp = temperature_c;
        let (pressure_hpa, upstream_pressure_pa, barometer_source) = match self.arbiter.select_barometer(now) {
            Some(external) => (
                round_to(external, 1),
                self.barometric.remove(external, factor_temp) * PA_PER_HPA,
                Source::External,
            ),
            None => (
                round_to(self.barometric.correct(raw.pressure_hpa, factor_temp), 1),
                raw.pressure_hpa * PA_PER_HPA,
                Source::Local,
            ),
        };

        let climate = CompensatedClimate {
            temperature_c,
            humidity_pct,
            pressure_hpa,
            temp_humidity_source,
            barometer_source,
            upstream_pressure_pa,
        };

        let raw_gas = sensors.read_gas()?;
        let mut gas = self.state.gas.concentrations(&raw_gas, &raw);
        gas.red_ppm = round_to(gas.red_ppm, 2);
        gas.oxi_ppm = round_to(gas.oxi_ppm, 2);
        gas.nh3_ppm = round_to(gas.nh3_ppm, 2);

        log_debug!(
            "Climate {:.1} °C {:.1} % {:.1} hPa, gas red {} oxi {} nh3 {} ppm",
            climate.temperature_c,
            climate.humidity_pct,
            climate.pressure_hpa,
            gas.red_ppm,
            gas.oxi_ppm,
            gas.nh3_ppm
        );

        let cycle = CycleValues { raw, local_temp, local_hum, climate, gas };
        self.latest = Some(cycle);
        self.first_climate_done = true;
        Ok(cycle)
    }

    fn log_barometer(&mut self, now: Timestamp, pressure_hpa: f64) {
        if self.state.barometer_logged_at.is_none() {
            self.state.forecast.available_at = now.saturating_add(FORECAST_LEAD_MS);
        }
        self.state.barometer_logged_at = Some(now);

        let insertion = self.state.barometer.insert(pressure_hpa);
        let forecast = if insertion.valid {
            Forecast::classify(pressure_hpa, insertion.change_hpa)
        } else {
            Forecast::InsufficientData
        };
        self.state.forecast = ForecastResult {
            forecast,
            trend: insertion.trend,
            change_hpa: insertion.change_hpa,
            valid: insertion.valid,
            available_at: self.state.forecast.available_at,
        };
        self.forecast_pending = true;
        log_info!(
            "Barometer logged: {:.1} hPa, 3 hour change {:.1} hPa, forecast {}",
            pressure_hpa,
            insertion.change_hpa,
            forecast.text()
        );
    }

    fn telemetry(&self, cycle: &CycleValues) -> TelemetryRecord {
        let climate = &cycle.climate;
        let pm = self.latest_particulates;
        let forecast = &self.state.forecast;
        TelemetryRecord {
            temp: climate.temperature_c,
            hum: (
                climate.humidity_pct,
                code(climate.humidity_description().home_automation_code()),
            ),
            bar: (climate.pressure_hpa, code(forecast.home_automation_code())),
            p1: pm.map(|p| p.pm1),
            p2_5: pm.map(|p| p.pm2_5),
            p10: pm.map(|p| p.pm10),
            red: cycle.gas.red_ppm,
            oxi: cycle.gas.oxi_ppm,
            nh3: cycle.gas.nh3_ppm,
            min_temp: self.state.min_temp,
            max_temp: self.state.max_temp,
            gas_calibrated: cycle.gas.calibrated,
            forecast: self
                .forecast_pending
                .then(|| TelemetryForecast::new(forecast.valid, forecast.change_hpa, forecast.text())),
        }
    }

    fn diagnostic(&self, cycle: &CycleValues, run_time_ms: u64) -> DiagnosticRecord {
        let climate = &cycle.climate;
        let external_th = climate.temp_humidity_source == Source::External;
        let external_bar = climate.barometer_source == Source::External;
        DiagnosticRecord {
            run_time_s: run_time_ms / MS_PER_SECOND,
            raw_temp: round_to(cycle.raw.temperature_c, 2),
            output_temp: round_to(cycle.local_temp, 2),
            real_temp: external_th.then_some(climate.temperature_c),
            raw_hum: round_to(cycle.raw.humidity_pct, 2),
            output_hum: round_to(cycle.local_hum, 2),
            real_hum: external_th.then_some(climate.humidity_pct),
            output_bar: (!external_bar).then_some(climate.pressure_hpa),
            real_bar: external_bar.then_some(climate.pressure_hpa),
            raw_bar: round_to(cycle.raw.pressure_hpa, 1),
            oxi: cycle.gas.oxi_ppm,
            red: cycle.gas.red_ppm,
            nh3: cycle.gas.nh3_ppm,
            raw_oxi_rs: cycle.gas.raw.oxidising,
            raw_red_rs: cycle.gas.raw.reducing,
            raw_nh3_rs: cycle.gas.raw.nh3,
        }
    }

    /// Record an external feed value received at `now`
    pub fn receive_external_feed(&mut self, update: ExternalUpdate, now: Timestamp) {
        self.arbiter.receive(update, now);
    }

    /// Current air-quality level
    ///
    /// Gas factors count only once the gas sensor is warm. Factors without a
    /// reading (no particulate counter, no climate cycle yet) are skipped.
    pub fn air_quality(&self) -> AqiResult {
        let warm = self.state.gas.is_warm();
        let mut readings: Vec<(AqiFactor, f64), FACTOR_COUNT> = Vec::new();
        for factor in AirQualityClassifier::active_factors(warm) {
            if let Some(value) = self.reading(factor) {
                // Capacity equals the number of factors
                let _ = readings.push((factor, value));
            }
        }
        self.aqi.classify(&readings)
    }

    fn reading(&self, factor: AqiFactor) -> Option<f64> {
        let pm = self.latest_particulates;
        let gas = self.latest.map(|c| c.gas);
        match factor {
            AqiFactor::Pm1 => pm.map(|p| p.pm1),
            AqiFactor::Pm2_5 => pm.map(|p| p.pm2_5),
            AqiFactor::Pm10 => pm.map(|p| p.pm10),
            AqiFactor::Oxi => gas.map(|g| g.oxi_ppm),
            AqiFactor::Red => gas.map(|g| g.red_ppm),
            AqiFactor::Nh3 => gas.map(|g| g.nh3_ppm),
        }
    }

    /// Latest forecast
    pub fn forecast(&self) -> &ForecastResult {
        &self.state.forecast
    }

    /// Latest compensated climate
    pub fn climate(&self) -> Option<CompensatedClimate> {
        self.latest.map(|c| c.climate)
    }

    /// Latest gas concentrations
    pub fn gas(&self) -> Option<GasConcentrations> {
        self.latest.map(|c| c.gas)
    }

    /// Latest particulate sample
    pub fn particulates(&self) -> Option<ParticulateSample> {
        self.latest_particulates
    }

    /// Engine state
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process start time
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Snapshot of the current state at `now`
    pub fn snapshot(&self, now: Timestamp) -> Snapshot {
        self.state.snapshot(now)
    }

    /// Record a display page change
    pub fn record_page_change(&mut self, display_mode: u8, now: Timestamp) {
        self.state.display_mode = display_mode;
        self.state.last_page_at = now;
    }
}

fn is_due(last: Option<Timestamp>, now: Timestamp, interval_ms: u64) -> bool {
    match last {
        Some(at) => elapsed_ms(at, now) >= interval_ms,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SensorError;
    use crate::sensors::{ClimateSensor, GasRawTriplet, GasSensor, ParticulateSensor};

    struct Climate(RawClimateSample);

    impl ClimateSensor for Climate {
        fn read_raw_climate(&mut self) -> Result<RawClimateSample, SensorError> {
            Ok(self.0)
        }
    }

    struct Gas(GasRawTriplet);

    impl GasSensor for Gas {
        fn read_raw_gas(&mut self) -> Result<GasRawTriplet, SensorError> {
            Ok(self.0)
        }

        fn reset(&mut self) {}
    }

    struct Pm(ParticulateSample);

    impl ParticulateSensor for Pm {
        fn read_particulates(&mut self) -> Result<ParticulateSample, SensorError> {
            Ok(self.0)
        }

        fn reset(&mut self) {}
    }

    fn rig() -> (Climate, Gas, Pm) {
        (
            Climate(RawClimateSample::new(25.0, 40.0, 1015.0)),
            Gas(GasRawTriplet::new(200_000.0, 20_000.0, 80_000.0)),
            Pm(ParticulateSample::new(3.0, 5.0, 8.0)),
        )
    }

    #[test]
    fn first_tick_runs_short_cycle_immediately() {
        let (mut c, mut g, mut p) = rig();
        let mut sensors = Sensors::new(&mut c, &mut g).with_particulates(&mut p);
        let mut engine = Engine::start(EngineConfig::default(), 0, &mut sensors).unwrap();
        let report = engine.tick(0, 12, &mut sensors).unwrap();
        assert!(report.climate.is_some());
        assert!(report.barometer_logged);
        assert!(report.telemetry.is_none());
        assert_eq!(engine.forecast().available_at, FORECAST_LEAD_MS);
    }

    #[test]
    fn first_reading_is_not_counted_in_max_min() {
        let (mut c, mut g, mut p) = rig();
        let mut sensors = Sensors::new(&mut c, &mut g).with_particulates(&mut p);
        let mut engine = Engine::start(EngineConfig::default(), 0, &mut sensors).unwrap();
        engine.tick(0, 12, &mut sensors).unwrap();
        assert_eq!(engine.state().max_temp, None);
        engine.tick(150_000, 12, &mut sensors).unwrap();
        assert!(engine.state().max_temp.is_some());
    }

    #[test]
    fn telemetry_waits_for_stabilisation_and_carries_forecast_once() {
        let (mut c, mut g, mut p) = rig();
        let mut sensors = Sensors::new(&mut c, &mut g).with_particulates(&mut p);
        let mut engine = Engine::start(EngineConfig::default(), 0, &mut sensors).unwrap();
        engine.tick(0, 12, &mut sensors).unwrap();
        assert!(engine.tick(300_000, 12, &mut sensors).unwrap().telemetry.is_none());

        let first = engine.tick(300_001, 12, &mut sensors).unwrap();
        let telemetry = first.telemetry.unwrap();
        assert!(telemetry.forecast.is_some());
        assert!(first.snapshot.is_some());

        let second = engine.tick(600_001, 12, &mut sensors).unwrap();
        assert!(second.telemetry.unwrap().forecast.is_none());
    }

    #[test]
    fn clean_air_classifies_as_all() {
        let (mut c, mut g, mut p) = rig();
        let mut sensors = Sensors::new(&mut c, &mut g).with_particulates(&mut p);
        let mut engine = Engine::start(EngineConfig::default(), 0, &mut sensors).unwrap();
        engine.tick(0, 12, &mut sensors).unwrap();
        assert_eq!(engine.air_quality().factor_name(), "All");
    }
}
