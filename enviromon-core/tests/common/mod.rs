//! Common test utilities for engine integration tests
//!
//! Provides scriptable fake sensors and a small driver that advances an
//! [`Engine`] through simulated wall-clock time.

#![allow(dead_code)]

use enviromon_core::sensors::{ClimateSensor, GasSensor, ParticulateSensor};
use enviromon_core::time::Timestamp;
use enviromon_core::{
    Engine, EngineConfig, EngineResult, GasRawTriplet, ParticulateSample, RawClimateSample, SensorError, Sensors,
    TickReport,
};

pub const MS_PER_HOUR: u64 = 3_600_000;

/// Climate fixture: constant room air at sea level
pub const ROOM_AIR: RawClimateSample = RawClimateSample::new(22.0, 45.0, 1010.0);

/// Climate sensor returning whatever the test put in `sample`
pub struct ScriptedClimate {
    pub sample: RawClimateSample,
    pub reads: u32,
}

impl ClimateSensor for ScriptedClimate {
    fn read_raw_climate(&mut self) -> Result<RawClimateSample, SensorError> {
        self.reads += 1;
        Ok(self.sample)
    }
}

/// Gas sensor that can be told to fail the next `fail_next` reads
pub struct ScriptedGas {
    pub triplet: GasRawTriplet,
    pub fail_next: u8,
    pub reads: u32,
    pub resets: u32,
}

impl GasSensor for ScriptedGas {
    fn read_raw_gas(&mut self) -> Result<GasRawTriplet, SensorError> {
        self.reads += 1;
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(SensorError::Timeout);
        }
        Ok(self.triplet)
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

/// Particulate counter fixture
pub struct ScriptedParticulates {
    pub sample: ParticulateSample,
    pub fail_next: u8,
}

impl ParticulateSensor for ScriptedParticulates {
    fn read_particulates(&mut self) -> Result<ParticulateSample, SensorError> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(SensorError::ChecksumMismatch);
        }
        Ok(self.sample)
    }

    fn reset(&mut self) {}
}

/// All three fake sensors plus the wall-clock hour at t = 0
pub struct Rig {
    pub climate: ScriptedClimate,
    pub gas: ScriptedGas,
    pub pm: ScriptedParticulates,
    pub start_hour: u8,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            climate: ScriptedClimate { sample: ROOM_AIR, reads: 0 },
            gas: ScriptedGas {
                triplet: GasRawTriplet::new(210_000.0, 20_000.0, 80_000.0),
                fail_next: 0,
                reads: 0,
                resets: 0,
            },
            pm: ScriptedParticulates { sample: ParticulateSample::new(2.0, 4.0, 6.0), fail_next: 0 },
            start_hour: 12,
        }
    }

    pub fn starting_at_hour(mut self, hour: u8) -> Self {
        self.start_hour = hour;
        self
    }

    pub fn sensors(&mut self) -> Sensors<'_> {
        Sensors::new(&mut self.climate, &mut self.gas).with_particulates(&mut self.pm)
    }

    /// Local hour of day at `now`
    pub fn hour_at(&self, now: Timestamp) -> u8 {
        ((u64::from(self.start_hour) + now / MS_PER_HOUR) % 24) as u8
    }

    pub fn start(&mut self, config: EngineConfig) -> Engine {
        Engine::start(config, 0, &mut self.sensors()).expect("engine starts")
    }

    pub fn tick(&mut self, engine: &mut Engine, now: Timestamp) -> EngineResult<TickReport> {
        let hour = self.hour_at(now);
        engine.tick(now, hour, &mut self.sensors())
    }

    /// Tick every `step_ms` from `from` up to and including `until`
    pub fn drive(
        &mut self,
        engine: &mut Engine,
        from: Timestamp,
        until: Timestamp,
        step_ms: u64,
    ) -> Vec<(Timestamp, TickReport)> {
        let mut reports = Vec::new();
        let mut now = from;
        while now <= until {
            let report = self.tick(engine, now).expect("tick succeeds");
            reports.push((now, report));
            now += step_ms;
        }
        reports
    }
}

/// Assert two floats agree to within `eps`
pub fn assert_close(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {expected} ± {eps}, got {actual}"
    );
}
