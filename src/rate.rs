//! Rate derivation for cumulative counters.

use std::time::{Duration, Instant};

use crate::measure::Measure;

/// Denominator of a derived rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(test), allow(dead_code))]
pub enum RateUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
}

impl RateUnit {
    /// Length of `elapsed` expressed in this unit
    pub fn count(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        match self {
            RateUnit::Millisecond => secs * 1000.0,
            RateUnit::Second => secs,
            RateUnit::Minute => secs / 60.0,
            RateUnit::Hour => secs / 3600.0,
        }
    }
}

/// Tracks a cumulative counter and derives its non-negative rate of change.
///
/// The previous sample survives across polling cycles; the base and derived measures
/// are reset at the start of each cycle with [`RateMeasure::reset_measures`].
#[derive(Debug, Clone)]
pub struct RateMeasure {
    base: Measure,
    rate: Measure,
    previous: Option<(f64, Instant)>,
    unit: RateUnit,
}

impl RateMeasure {
    pub fn new(unit: RateUnit) -> Self {
        Self {
            base: Measure::new(),
            rate: Measure::new(),
            previous: None,
            unit,
        }
    }

    /// Records the latest absolute counter value taken at `timestamp`
    pub fn sample(&mut self, value: f64, timestamp: Instant) {
        self.base.set_value(value);

        if let Some((last_value, last_time)) = self.previous {
            let elapsed = timestamp
                .checked_duration_since(last_time)
                .map(|d| self.unit.count(d))
                .unwrap_or(0.0);

            if elapsed > 0.0 {
                // counters drop when indices are deleted; report that as 0, not negative
                let rate = ((value - last_value) / elapsed).max(0.0);
                self.rate.set_value(rate);
            }
        }

        self.previous = Some((value, timestamp));
    }

    pub fn base_measure(&self) -> &Measure {
        &self.base
    }

    pub fn derived_measure(&self) -> &Measure {
        &self.rate
    }

    /// Clears this cycle's measures, keeping the previous sample
    pub fn reset_measures(&mut self) {
        self.base = Measure::new();
        self.rate = Measure::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_has_no_rate() {
        let mut rate = RateMeasure::new(RateUnit::Second);
        rate.sample(100.0, Instant::now());

        assert_eq!(rate.base_measure().value(), 100.0);
        assert!(!rate.derived_measure().is_written());
        assert_eq!(rate.derived_measure().value(), 0.0);
    }

    #[test]
    fn test_rate_per_second() {
        let t0 = Instant::now();
        let mut rate = RateMeasure::new(RateUnit::Second);
        rate.sample(100.0, t0);
        rate.sample(160.0, t0 + Duration::from_secs(2));

        assert_eq!(rate.derived_measure().value(), 30.0);
    }

    #[test]
    fn test_rate_per_minute() {
        let t0 = Instant::now();
        let mut rate = RateMeasure::new(RateUnit::Minute);
        rate.sample(0.0, t0);
        rate.sample(90.0, t0 + Duration::from_secs(30));

        assert_eq!(rate.derived_measure().value(), 180.0);
    }

    #[test]
    fn test_unit_counts() {
        let elapsed = Duration::from_secs(90);
        assert_eq!(RateUnit::Millisecond.count(elapsed), 90_000.0);
        assert_eq!(RateUnit::Second.count(elapsed), 90.0);
        assert_eq!(RateUnit::Minute.count(elapsed), 1.5);
        assert_eq!(RateUnit::Hour.count(Duration::from_secs(1800)), 0.5);
    }

    #[test]
    fn test_decreasing_counter_clamps_to_zero() {
        let t0 = Instant::now();
        let mut rate = RateMeasure::new(RateUnit::Second);
        rate.sample(100.0, t0);
        rate.sample(90.0, t0 + Duration::from_secs(1));

        assert!(rate.derived_measure().is_written());
        assert_eq!(rate.derived_measure().value(), 0.0);
        assert_eq!(rate.base_measure().value(), 90.0);
    }

    #[test]
    fn test_identical_timestamps_skip_rate_but_update_previous() {
        let t0 = Instant::now();
        let mut rate = RateMeasure::new(RateUnit::Second);
        rate.sample(100.0, t0);
        rate.sample(120.0, t0);
        assert!(!rate.derived_measure().is_written());

        // compares against 120, not 100
        rate.sample(160.0, t0 + Duration::from_secs(2));
        assert_eq!(rate.derived_measure().value(), 20.0);
    }

    #[test]
    fn test_reset_keeps_previous_sample() {
        let t0 = Instant::now();
        let mut rate = RateMeasure::new(RateUnit::Second);
        rate.sample(10.0, t0);
        rate.reset_measures();
        assert!(!rate.base_measure().is_written());

        rate.sample(20.0, t0 + Duration::from_secs(5));
        assert_eq!(rate.derived_measure().value(), 2.0);
    }
}
