//! Poll scheduling
//!
//! The updater runs a pass, then asks its [`PollSchedule`] to wait for the
//! next one. The wait is the only suspension point between passes.

use async_trait::async_trait;
use std::time::Duration;

/// Decides when the next pass runs, and whether there is one
#[async_trait]
pub trait PollSchedule: Send {
    /// Wait until the next pass is due
    ///
    /// Returns `false` when polling should stop instead.
    async fn wait(&mut self) -> bool;
}

/// Sleep a fixed duration between passes, forever
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl PollSchedule for FixedInterval {
    async fn wait(&mut self) -> bool {
        tokio::time::sleep(self.interval).await;
        true
    }
}

/// Run a bounded number of passes
///
/// The first pass runs before any wait, so `passes(0)` and `passes(1)` both
/// run exactly one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitedSchedule {
    remaining_waits: usize,
    interval: Duration,
}

impl LimitedSchedule {
    /// Stop after `passes` passes, without sleeping in between
    pub fn passes(passes: usize) -> Self {
        Self::with_interval(passes, Duration::ZERO)
    }

    /// Stop after `passes` passes, sleeping `interval` in between
    pub fn with_interval(passes: usize, interval: Duration) -> Self {
        Self {
            remaining_waits: passes.saturating_sub(1),
            interval,
        }
    }
}

#[async_trait]
impl PollSchedule for LimitedSchedule {
    async fn wait(&mut self) -> bool {
        if self.remaining_waits == 0 {
            return false;
        }
        self.remaining_waits -= 1;
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
        true
    }
}
