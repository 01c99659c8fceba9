//! Seeds-per-second measurement over the generated counter.

use std::time::Duration;

/// Default spacing between rate samples.
const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// Samples a monotonically growing counter at a fixed interval.
///
/// A counter that goes backwards (after an invalidation reset) is treated as
/// having restarted from zero.
#[derive(Clone, Debug)]
pub struct GenerationRate {
    interval: Duration,
    last: Option<(Duration, u64)>,
    per_second: u32,
}

impl GenerationRate {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            per_second: 0,
        }
    }

    /// Feed the counter value observed at `elapsed` since some fixed start.
    ///
    /// Returns the new rate when at least one interval has passed since the
    /// previous sample.
    pub fn sample(&mut self, elapsed: Duration, total: u64) -> Option<u32> {
        let Some((last_time, last_total)) = self.last else {
            self.last = Some((elapsed, total));
            return None;
        };

        let dt = elapsed.saturating_sub(last_time);
        if dt < self.interval || dt.is_zero() {
            return None;
        }

        let delta = if total >= last_total { total - last_total } else { total };
        self.per_second = (delta as f64 / dt.as_secs_f64()).round() as u32;
        self.last = Some((elapsed, total));
        Some(self.per_second)
    }

    /// Most recent rate, 0 before the second sample.
    pub fn per_second(&self) -> u32 {
        self.per_second
    }
}

impl Default for GenerationRate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_rate_over_interval() {
        let mut rate = GenerationRate::new();
        assert_eq!(rate.sample(ms(0), 0), None, "First sample only sets the baseline");
        assert_eq!(rate.sample(ms(100), 10), None, "Too soon");
        assert_eq!(rate.sample(ms(200), 40), Some(200));
        assert_eq!(rate.per_second(), 200);
    }

    #[test]
    fn test_counter_reset_counts_from_zero() {
        let mut rate = GenerationRate::new();
        rate.sample(ms(0), 500);
        assert_eq!(rate.sample(ms(500), 50), Some(100));
    }

    #[test]
    fn test_custom_interval() {
        let mut rate = GenerationRate::with_interval(Duration::from_secs(1));
        rate.sample(ms(0), 0);
        assert_eq!(rate.sample(ms(900), 90), None);
        assert_eq!(rate.sample(ms(1000), 100), Some(100));
    }
}
