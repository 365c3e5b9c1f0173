//! Wall clock for the monitor loop

use chrono::{Local, Timelike, Utc};
use enviromon_core::time::Timestamp;
use enviromon_core::traits::TimeSource;

/// System clock: epoch milliseconds and the local hour of day
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        // Before 1970 only on a badly set RTC; treat as epoch
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }

    fn hour_of_day(&self) -> u8 {
        Local::now().hour() as u8
    }
}
