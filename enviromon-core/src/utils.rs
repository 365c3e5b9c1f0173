//! Numeric helpers shared by the compensation stages

/// Round to `decimals` places, ties to even
///
/// Stored telemetry was produced with banker's rounding, so `2.5` rounds to
/// `2.0` and `0.25` to `0.2` at one decimal.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if decimals == 0 {
        return libm::rint(value);
    }
    let scale = libm::pow(10.0, f64::from(decimals));
    libm::rint(value * scale) / scale
}

/// Round to whole units, ties to even
pub fn round_whole(value: f64) -> f64 {
    libm::rint(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_go_to_even() {
        assert_eq!(round_whole(2.5), 2.0);
        assert_eq!(round_whole(3.5), 4.0);
        assert_eq!(round_whole(-2.5), -2.0);
    }

    #[test]
    fn rounds_to_decimals() {
        assert!((round_to(1015.26, 1) - 1015.3).abs() < 1e-9);
        assert!((round_to(45.678, 0) - 46.0).abs() < 1e-9);
        assert!((round_to(21.04, 1) - 21.0).abs() < 1e-9);
    }
}
