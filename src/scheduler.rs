//! Tick timer owned by whoever drives the engine.
//!
//! Changing the period cancels the running interval and starts a new one, so
//! a speed change never double-fires or drops a tick; the first tick after a
//! change simply waits one full new period.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

pub struct TickScheduler {
    interval: Interval,
    period: Duration,
    paused: bool,
}

impl TickScheduler {
    /// Create a scheduler whose first tick fires one `period` from now
    pub fn new(period: Duration) -> Self {
        Self {
            interval: Self::make_interval(period),
            period,
            paused: false,
        }
    }

    fn make_interval(period: Duration) -> Interval {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Swap the period. A no-op when the period is unchanged.
    pub fn set_period(&mut self, period: Duration) {
        if period == self.period {
            return;
        }
        self.period = period;
        self.interval = Self::make_interval(period);
    }

    /// Restart the countdown without changing the period
    pub fn restart(&mut self) {
        self.interval = Self::make_interval(self.period);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume ticking; the next tick is one full period away
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.restart();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Wait for the next tick. Never completes while paused.
    pub async fn tick(&mut self) -> Instant {
        if self.paused {
            return std::future::pending().await;
        }
        self.interval.tick().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_period() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(Duration::from_millis(150));

        let fired = scheduler.tick().await;

        assert_eq!(fired - start, Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn test_period_change_reschedules() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(150));
        scheduler.tick().await;

        let changed_at = Instant::now();
        scheduler.set_period(Duration::from_millis(100));
        let first = scheduler.tick().await;
        let second = scheduler.tick().await;

        assert_eq!(first - changed_at, Duration::from_millis(100));
        assert_eq!(second - first, Duration::from_millis(100));
        assert_eq!(scheduler.period(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_period_keeps_schedule() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(Duration::from_millis(100));
        tokio::time::advance(Duration::from_millis(60)).await;

        scheduler.set_period(Duration::from_millis(100));
        let fired = scheduler.tick().await;

        assert_eq!(fired - start, Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_scheduler_does_not_tick() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(50));
        scheduler.pause();
        assert!(scheduler.is_paused());

        let timed_out =
            tokio::time::timeout(Duration::from_millis(500), scheduler.tick()).await;
        assert!(timed_out.is_err());

        scheduler.resume();
        let resumed_at = Instant::now();
        let fired = scheduler.tick().await;
        assert_eq!(fired - resumed_at, Duration::from_millis(50));
    }
}
