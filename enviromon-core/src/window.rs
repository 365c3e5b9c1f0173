//! Fixed-capacity rolling window of daily calibration values
//!
//! Backed by `heapless::Vec` so the daily calibration history needs no
//! allocator. When the window is full the oldest value is dropped before the
//! new one is appended, so iteration order is always oldest-first.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rolling window holding at most `N` values
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RollingWindow<const N: usize> {
    values: Vec<f64, N>,
}

impl<const N: usize> Default for RollingWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RollingWindow<N> {
    /// Empty window
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Replace the whole history with `N` copies of `value`
    pub fn seed(&mut self, value: f64) {
        self.values.clear();
        while self.values.push(value).is_ok() {}
    }

    /// Append `value`, dropping the oldest entry when full
    pub fn push(&mut self, value: f64) {
        if self.values.is_full() && !self.values.is_empty() {
            self.values.remove(0);
        }
        // Only fails for a zero-capacity window
        let _ = self.values.push(value);
    }

    /// Arithmetic mean, `None` while empty
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let sum: f64 = self.values.iter().sum();
        Some(sum / self.values.len() as f64)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been pushed or seeded
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Oldest-first view of the stored values
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Most recently pushed value
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }
}
