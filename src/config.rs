use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::ensure;

/// Benchmark constants. The binary only ever runs with `Config::default()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Table sizes swept, one run each.
    pub diners: RangeInclusive<usize>,
    /// Bounds of a single meal, in milliseconds.
    pub meal_ms: RangeInclusive<u64>,
    /// Eating time after which a philosopher leaves the table.
    pub full: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            diners: 2..=32,
            meal_ms: 1..=10,
            full: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.diners.is_empty() && *self.diners.start() >= 2,
            "a table needs at least 2 diners, got {:?}",
            self.diners
        );
        ensure!(
            !self.meal_ms.is_empty() && *self.meal_ms.start() >= 1,
            "meals must last at least 1ms, got {:?}",
            self.meal_ms
        );
        ensure!(!self.full.is_zero(), "philosophers must have an appetite");
        Ok(())
    }
}
