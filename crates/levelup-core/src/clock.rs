//! The buff clock.
//!
//! One real-time tick source per dashboard. Ticks the runtime could not
//! deliver on time are skipped rather than replayed, so a stalled process
//! never produces a burst of catch-up ticks.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Default tick cadence (1 Hz)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Sequence number of a delivered tick, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tick(pub u64);

#[derive(Debug)]
pub struct Clock {
    interval: Interval,
    period: Duration,
    delivered: u64,
}

impl Clock {
    /// Clock whose first tick lands one `period` after creation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            interval,
            period,
            delivered: 0,
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TICK_INTERVAL_MS))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks delivered so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Wait for the next tick. Cancel safe.
    pub async fn tick(&mut self) -> Tick {
        self.interval.tick().await;
        self.delivered += 1;
        Tick(self.delivered)
    }
}
