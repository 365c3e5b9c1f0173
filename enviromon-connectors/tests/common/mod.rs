//! Shared fixtures for monitor tests

#![allow(dead_code)]

use enviromon_connectors::{Connector, ConnectorError};
use enviromon_core::sensors::{ClimateSensor, GasSensor, ParticulateSensor};
use enviromon_core::{GasRawTriplet, ParticulateSample, RawClimateSample, SensorError, Sensors};

pub struct Climate(pub RawClimateSample);

impl ClimateSensor for Climate {
    fn read_raw_climate(&mut self) -> Result<RawClimateSample, SensorError> {
        Ok(self.0)
    }
}

pub struct Gas(pub GasRawTriplet);

impl GasSensor for Gas {
    fn read_raw_gas(&mut self) -> Result<GasRawTriplet, SensorError> {
        Ok(self.0)
    }

    fn reset(&mut self) {}
}

pub struct Particulates(pub ParticulateSample);

impl ParticulateSensor for Particulates {
    fn read_particulates(&mut self) -> Result<ParticulateSample, SensorError> {
        Ok(self.0)
    }

    fn reset(&mut self) {}
}

/// Sensor set in steady indoor air
pub struct Bench {
    pub climate: Climate,
    pub gas: Gas,
    pub pm: Particulates,
}

impl Bench {
    pub fn new() -> Self {
        Self {
            climate: Climate(RawClimateSample::new(23.0, 42.0, 1011.0)),
            gas: Gas(GasRawTriplet::new(190_000.0, 22_000.0, 85_000.0)),
            pm: Particulates(ParticulateSample::new(1.0, 2.0, 3.0)),
        }
    }

    pub fn sensors(&mut self) -> Sensors<'_> {
        Sensors::new(&mut self.climate, &mut self.gas).with_particulates(&mut self.pm)
    }
}

/// Connector with no broker behind it
#[derive(Debug, Default)]
pub struct Offline;

impl Connector for Offline {
    type Error = ConnectorError;

    fn send(&mut self, _topic: &str, _data: &[u8]) -> Result<(), Self::Error> {
        Err(ConnectorError::NotConnected)
    }

    fn is_connected(&self) -> bool {
        false
    }
}
