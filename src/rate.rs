// Running frame-rate counter. Reset on every mode switch, ticked once per shown frame.

use std::time::Instant;

/// Frame count plus the monotonic start/current times, in seconds since the monitor's epoch.
pub struct RateMonitor {
    epoch: Instant,
    frame_count: u64,
    start_time: f64,
    current_time: f64,
    rate: f64,
}

impl RateMonitor {
    pub fn new() -> Self {
        let mut rm = Self {
            epoch: Instant::now(),
            frame_count: 0,
            start_time: 0.0,
            current_time: 0.0,
            rate: 0.0,
        };
        rm.reset();
        rm
    }

    /// Seconds elapsed on the monotonic clock since this monitor was created.
    pub fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    pub fn reset(&mut self) {
        let now = self.now();
        self.reset_at(now);
    }

    pub fn reset_at(&mut self, now: f64) {
        self.frame_count = 0;
        self.start_time = now;
        self.current_time = now;
        self.rate = 0.0;
    }

    /// Count one frame and recompute the rate.
    pub fn tick(&mut self) -> f64 {
        let now = self.now();
        self.tick_at(now)
    }

    // No guard on the denominator: right after a reset it is close to zero and
    // the first reading is huge (or inf). That reading is shown as-is.
    pub fn tick_at(&mut self, now: f64) -> f64 {
        self.frame_count += 1;
        self.current_time = now;
        self.rate = self.frame_count as f64 / (self.current_time - self.start_time);
        self.rate
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The HUD line stamped onto every frame.
    pub fn status_text(&self) -> String {
        format!(
            "fr: {:.3} fc: {} ctime: {:.3} stime: {:.3}",
            self.rate, self.frame_count, self.current_time, self.start_time
        )
    }
}

impl Default for RateMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_zeroes_count_and_next_tick_is_one() {
        let mut rm = RateMonitor::new();
        rm.reset_at(5.0);
        for i in 1..=4 {
            rm.tick_at(5.0 + i as f64);
        }
        assert_eq!(rm.frame_count(), 4);

        rm.reset_at(20.0);
        assert_eq!(rm.frame_count(), 0);
        assert_eq!(rm.start_time(), 20.0);
        rm.tick_at(20.5);
        assert_eq!(rm.frame_count(), 1);
        assert!((rm.rate() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn ten_frames_over_two_seconds() {
        let mut rm = RateMonitor::new();
        rm.reset_at(100.0);
        for i in 1..=10 {
            rm.tick_at(100.0 + 0.2 * i as f64);
        }
        assert_eq!(rm.frame_count(), 10);
        assert!((rm.rate() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn first_tick_at_reset_instant_is_not_corrected() {
        let mut rm = RateMonitor::new();
        rm.reset_at(1.0);
        let r = rm.tick_at(1.0);
        assert!(r.is_infinite());
        assert!(rm.status_text().starts_with("fr: inf fc: 1"));
    }

    #[test]
    fn status_text_layout() {
        let mut rm = RateMonitor::new();
        rm.reset_at(2.0);
        rm.tick_at(4.0);
        assert_eq!(rm.status_text(), "fr: 0.500 fc: 1 ctime: 4.000 stime: 2.000");
    }

    #[test]
    fn wall_clock_tick_counts() {
        let mut rm = RateMonitor::new();
        rm.reset();
        rm.tick();
        rm.tick();
        assert_eq!(rm.frame_count(), 2);
        assert!(rm.current_time() >= rm.start_time());
    }
}
