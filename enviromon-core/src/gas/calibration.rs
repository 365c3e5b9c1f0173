//! Gas Sensor Baseline Calibration
//!
//! ## Life Cycle
//!
//! ```text
//!  start ──► Cold ──(run time > warm-up)──► Warm ──┐
//!            R0 = raw at start                     │ daily, at the
//!            no compensation                       │ calibration hour
//!                                                  └──► 7-day rolling R0
//! ```
//!
//! ### Cold
//!
//! The heater needs well over an hour to stabilise, so readings during that
//! time are only indicative. R0 is a single raw reading taken at start-up and
//! raw resistances are used without drift compensation.
//!
//! ### Warm-up transition
//!
//! Happens exactly once per process, the first time the elapsed run time is
//! strictly greater than the warm-up duration. A fresh raw triplet becomes
//! R0 and the most recent raw climate becomes the reference point. All seven
//! slots of every rolling window are seeded with these values so the first
//! daily average is not dragged towards zero.
//!
//! ### Daily recalibration
//!
//! Sensing layers age and R0 drifts over weeks. Once per day, at the
//! configured local hour, the manager:
//!
//! 1. pushes the latest raw temperature/humidity/pressure into their windows
//! 2. moves the reference point to the window means (0.1 °C, 1 %, 0.1 hPa)
//! 3. compensates a fresh raw triplet against the new reference
//! 4. pushes those spot R0s and sets R0 to the window means (whole ohms)
//!
//! A "completed today" flag prevents a second run inside the same hour. It is
//! cleared when the clock reaches the following hour.

use crate::constants::gas::{CALIBRATION_WINDOW_DAYS, DEFAULT_CALIBRATION_HOUR};
use crate::constants::time::{GAS_WARMUP_MS, HOURS_PER_DAY};
use crate::gas::{GasBaseline, GasChannel, GasCompensationEngine, GasConcentrations};
use crate::sensors::{GasRawTriplet, RawClimateSample};
use crate::utils::{round_to, round_whole};
use crate::window::RollingWindow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Warm-up state of the gas sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GasCalibrationState {
    /// Heater still settling, raw resistances used as-is
    #[default]
    Cold,
    /// Baseline established, drift compensation active
    Warm,
}

/// When warm-up ends and when the daily recalibration runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationSchedule {
    /// Run time after which the sensor counts as warm (ms)
    pub warmup_ms: u64,
    /// Local hour of day for the daily recalibration
    pub calibration_hour: u8,
}

impl Default for CalibrationSchedule {
    fn default() -> Self {
        Self {
            warmup_ms: GAS_WARMUP_MS,
            calibration_hour: DEFAULT_CALIBRATION_HOUR,
        }
    }
}

impl CalibrationSchedule {
    /// Hour at which the "completed today" flag is cleared
    pub fn reset_hour(&self) -> u8 {
        (self.calibration_hour + 1) % HOURS_PER_DAY
    }
}

/// Seven-day histories behind the daily baseline
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationHistory {
    /// Daily raw temperatures
    pub temps: RollingWindow<CALIBRATION_WINDOW_DAYS>,
    /// Daily raw humidities
    pub hums: RollingWindow<CALIBRATION_WINDOW_DAYS>,
    /// Daily raw pressures
    pub bars: RollingWindow<CALIBRATION_WINDOW_DAYS>,
    /// Daily reducing R0 spot values
    pub red_r0: RollingWindow<CALIBRATION_WINDOW_DAYS>,
    /// Daily oxidising R0 spot values
    pub oxi_r0: RollingWindow<CALIBRATION_WINDOW_DAYS>,
    /// Daily ammonia R0 spot values
    pub nh3_r0: RollingWindow<CALIBRATION_WINDOW_DAYS>,
}

impl CalibrationHistory {
    fn seed(&mut self, baseline: &GasBaseline) {
        self.temps.seed(baseline.calib_temp);
        self.hums.seed(baseline.calib_hum);
        self.bars.seed(baseline.calib_bar);
        self.red_r0.seed(baseline.red_r0);
        self.oxi_r0.seed(baseline.oxi_r0);
        self.nh3_r0.seed(baseline.nh3_r0);
    }
}

/// Owner of the R0 baselines and the warm-up / daily state machine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasCalibrationManager {
    state: GasCalibrationState,
    baseline: GasBaseline,
    history: CalibrationHistory,
    daily_completed: bool,
    #[cfg_attr(feature = "serde", serde(skip, default))]
    schedule: CalibrationSchedule,
    #[cfg_attr(feature = "serde", serde(skip, default))]
    engine: GasCompensationEngine,
}

impl GasCalibrationManager {
    /// Cold manager with R0 from a start-up read and the start-up climate
    pub fn new(initial_r0: GasRawTriplet, reference: RawClimateSample, schedule: CalibrationSchedule) -> Self {
        log_info!(
            "Start-up R0: red {} oxi {} nh3 {}",
            initial_r0.reducing,
            initial_r0.oxidising,
            initial_r0.nh3
        );
        Self {
            state: GasCalibrationState::Cold,
            baseline: baseline_from(&initial_r0, &reference),
            history: CalibrationHistory::default(),
            daily_completed: false,
            schedule,
            engine: GasCompensationEngine::new(),
        }
    }

    /// Re-apply the schedule after restoring from a snapshot
    pub fn with_schedule(mut self, schedule: CalibrationSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Current warm-up state
    pub fn state(&self) -> GasCalibrationState {
        self.state
    }

    /// True once the warm-up baseline exists
    pub fn is_warm(&self) -> bool {
        self.state == GasCalibrationState::Warm
    }

    /// Current baseline
    pub fn baseline(&self) -> &GasBaseline {
        &self.baseline
    }

    /// Rolling daily histories
    pub fn history(&self) -> &CalibrationHistory {
        &self.history
    }

    /// Active schedule
    pub fn schedule(&self) -> &CalibrationSchedule {
        &self.schedule
    }

    /// Whether today's recalibration already ran
    pub fn daily_completed(&self) -> bool {
        self.daily_completed
    }

    /// Whether the warm-up transition should run now
    pub fn warmup_due(&self, elapsed_ms: u64) -> bool {
        self.state == GasCalibrationState::Cold && elapsed_ms > self.schedule.warmup_ms
    }

    /// Cold → Warm with a fresh triplet and the latest raw climate
    ///
    /// Ignored when already Warm.
    pub fn complete_warmup(&mut self, fresh: GasRawTriplet, env: RawClimateSample) {
        if self.is_warm() {
            return;
        }
        self.baseline = baseline_from(&fresh, &env);
        self.history.seed(&self.baseline);
        self.state = GasCalibrationState::Warm;
        log_info!(
            "Gas sensor warm-up complete. R0 red {} oxi {} nh3 {} at {:.1} °C {:.0} % {:.1} hPa",
            self.baseline.red_r0,
            self.baseline.oxi_r0,
            self.baseline.nh3_r0,
            self.baseline.calib_temp,
            self.baseline.calib_hum,
            self.baseline.calib_bar
        );
    }

    /// Whether the daily recalibration should run now
    ///
    /// Requires Warm, the calibration hour, not yet done today and at least
    /// one completed climate cycle.
    pub fn daily_due(&self, hour_of_day: u8, first_climate_done: bool) -> bool {
        self.is_warm()
            && first_climate_done
            && !self.daily_completed
            && hour_of_day == self.schedule.calibration_hour
    }

    /// Run the daily 7-day rolling recalibration
    ///
    /// `env` is the raw climate of the latest cycle and `fresh` a triplet
    /// read just now. Does nothing unless Warm and not yet done today.
    pub fn daily_recalibrate(&mut self, fresh: GasRawTriplet, env: RawClimateSample) {
        if !self.is_warm() || self.daily_completed {
            return;
        }
        log_debug!(
            "Daily recalibration. Old R0 red {} oxi {} nh3 {}",
            self.baseline.red_r0,
            self.baseline.oxi_r0,
            self.baseline.nh3_r0
        );

        self.history.temps.push(env.temperature_c);
        self.history.hums.push(env.humidity_pct);
        self.history.bars.push(env.pressure_hpa);
        self.baseline.calib_temp = mean_or(&self.history.temps, env.temperature_c, 1);
        self.baseline.calib_hum = mean_or(&self.history.hums, env.humidity_pct, 0);
        self.baseline.calib_bar = mean_or(&self.history.bars, env.pressure_hpa, 1);

        let spot = self.engine.compensate_triplet(&fresh, &self.baseline, &env);
        self.history.red_r0.push(spot.reducing);
        self.history.oxi_r0.push(spot.oxidising);
        self.history.nh3_r0.push(spot.nh3);
        self.baseline.red_r0 = mean_or(&self.history.red_r0, spot.reducing, 0);
        self.baseline.oxi_r0 = mean_or(&self.history.oxi_r0, spot.oxidising, 0);
        self.baseline.nh3_r0 = mean_or(&self.history.nh3_r0, spot.nh3, 0);

        self.daily_completed = true;
        log_info!(
            "Daily recalibration done. R0 red {} oxi {} nh3 {} at {:.1} °C {:.0} % {:.1} hPa",
            self.baseline.red_r0,
            self.baseline.oxi_r0,
            self.baseline.nh3_r0,
            self.baseline.calib_temp,
            self.baseline.calib_hum,
            self.baseline.calib_bar
        );
    }

    /// Clear the "completed today" flag once the next hour is reached
    pub fn update_daily_flag(&mut self, hour_of_day: u8) {
        if self.daily_completed && hour_of_day == self.schedule.reset_hour() {
            self.daily_completed = false;
        }
    }

    /// Compensated resistances for this cycle (raw while Cold)
    pub fn compensated(&self, raw: &GasRawTriplet, env: &RawClimateSample) -> GasRawTriplet {
        if self.is_warm() {
            self.engine.compensate_triplet(raw, &self.baseline, env)
        } else {
            *raw
        }
    }

    /// Concentrations for a raw triplet and the raw climate it was read in
    pub fn concentrations(&self, raw: &GasRawTriplet, env: &RawClimateSample) -> GasConcentrations {
        let compensated = self.compensated(raw, env);
        let [red_ppm, oxi_ppm, nh3_ppm] = self.engine.concentrations(&compensated, &self.baseline);
        GasConcentrations {
            red_ppm,
            oxi_ppm,
            nh3_ppm,
            raw: *raw,
            compensated,
            calibrated: self.is_warm(),
        }
    }

    /// R0 of one channel
    pub fn r0(&self, channel: GasChannel) -> f64 {
        self.baseline.r0(channel)
    }
}

fn baseline_from(r0: &GasRawTriplet, env: &RawClimateSample) -> GasBaseline {
    GasBaseline {
        red_r0: r0.reducing,
        oxi_r0: r0.oxidising,
        nh3_r0: r0.nh3,
        calib_temp: env.temperature_c,
        calib_hum: env.humidity_pct,
        calib_bar: env.pressure_hpa,
    }
}

fn mean_or(window: &RollingWindow<CALIBRATION_WINDOW_DAYS>, fallback: f64, decimals: i32) -> f64 {
    let mean = window.mean().unwrap_or(fallback);
    if decimals == 0 {
        round_whole(mean)
    } else {
        round_to(mean, decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(t: f64, h: f64, p: f64) -> RawClimateSample {
        RawClimateSample::new(t, h, p)
    }

    fn manager() -> GasCalibrationManager {
        GasCalibrationManager::new(
            GasRawTriplet::new(150_000.0, 20_000.0, 80_000.0),
            env(24.0, 45.0, 1010.0),
            CalibrationSchedule::default(),
        )
    }

    #[test]
    fn starts_cold_with_startup_reading() {
        let m = manager();
        assert_eq!(m.state(), GasCalibrationState::Cold);
        assert_eq!(m.baseline().red_r0, 150_000.0);
        assert_eq!(m.baseline().calib_bar, 1010.0);
        assert!(m.history().temps.is_empty());
    }

    #[test]
    fn warmup_needs_strictly_more_than_duration() {
        let m = manager();
        assert!(!m.warmup_due(GAS_WARMUP_MS));
        assert!(m.warmup_due(GAS_WARMUP_MS + 1));
    }

    #[test]
    fn warmup_seeds_every_window() {
        let mut m = manager();
        m.complete_warmup(GasRawTriplet::new(210_000.0, 25_000.0, 90_000.0), env(22.0, 50.0, 1005.0));
        assert!(m.is_warm());
        assert_eq!(m.baseline().red_r0, 210_000.0);
        assert_eq!(m.baseline().calib_temp, 22.0);
        assert_eq!(m.history().red_r0.len(), CALIBRATION_WINDOW_DAYS);
        assert_eq!(m.history().bars.mean(), Some(1005.0));
        assert!(!m.warmup_due(u64::MAX));
    }

    #[test]
    fn second_warmup_is_ignored() {
        let mut m = manager();
        m.complete_warmup(GasRawTriplet::new(210_000.0, 25_000.0, 90_000.0), env(22.0, 50.0, 1005.0));
        m.complete_warmup(GasRawTriplet::new(1.0, 1.0, 1.0), env(0.0, 0.0, 0.0));
        assert_eq!(m.baseline().red_r0, 210_000.0);
    }

    #[test]
    fn cold_uses_raw_resistance() {
        let m = manager();
        let raw = GasRawTriplet::new(75_000.0, 10_000.0, 40_000.0);
        let gas = m.concentrations(&raw, &env(30.0, 20.0, 990.0));
        assert_eq!(gas.compensated, raw);
        assert!(!gas.calibrated);
    }

    #[test]
    fn daily_runs_once_and_resets_next_hour() {
        let mut m = manager();
        m.complete_warmup(GasRawTriplet::new(210_000.0, 25_000.0, 90_000.0), env(22.0, 50.0, 1005.0));

        assert!(m.daily_due(3, true));
        assert!(!m.daily_due(3, false));
        assert!(!m.daily_due(2, true));

        m.daily_recalibrate(GasRawTriplet::new(203_000.0, 25_700.0, 90_000.0), env(22.0, 50.0, 1005.0));
        assert!(m.daily_completed());
        assert!(!m.daily_due(3, true));

        m.update_daily_flag(3);
        assert!(m.daily_completed());
        m.update_daily_flag(4);
        assert!(!m.daily_completed());
    }

    #[test]
    fn daily_averages_spot_r0_into_window() {
        let mut m = manager();
        m.complete_warmup(GasRawTriplet::new(210_000.0, 25_000.0, 90_000.0), env(22.0, 50.0, 1005.0));
        // Same climate as the reference, so the spot R0 equals the fresh raw value
        m.daily_recalibrate(GasRawTriplet::new(203_000.0, 25_000.0, 90_000.0), env(22.0, 50.0, 1005.0));
        // (6 * 210000 + 203000) / 7 = 209000
        assert_eq!(m.baseline().red_r0, 209_000.0);
        assert_eq!(m.baseline().oxi_r0, 25_000.0);
        assert_eq!(m.history().red_r0.latest(), Some(203_000.0));
    }

    #[test]
    fn reference_means_are_rounded() {
        let mut m = manager();
        m.complete_warmup(GasRawTriplet::new(1000.0, 1000.0, 1000.0), env(20.0, 40.0, 1000.0));
        m.daily_recalibrate(GasRawTriplet::new(1000.0, 1000.0, 1000.0), env(20.7, 43.5, 1000.7));
        // temp mean 20.1, hum mean 40.5 -> 40 (ties to even), bar mean 1000.1
        assert!((m.baseline().calib_temp - 20.1).abs() < 1e-9);
        assert_eq!(m.baseline().calib_hum, 40.0);
        assert!((m.baseline().calib_bar - 1000.1).abs() < 1e-9);
    }

    #[test]
    fn reset_hour_wraps_at_midnight() {
        let schedule = CalibrationSchedule { warmup_ms: 1, calibration_hour: 23 };
        assert_eq!(schedule.reset_hour(), 0);
    }

    #[test]
    fn daily_ignored_while_cold() {
        let mut m = manager();
        m.daily_recalibrate(GasRawTriplet::new(1.0, 1.0, 1.0), env(0.0, 0.0, 0.0));
        assert!(!m.daily_completed());
        assert_eq!(m.baseline().red_r0, 150_000.0);
    }
}
