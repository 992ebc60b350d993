//! Adaptive pacing for the replay loop.
//!
//! [`ThrottleController`] is a proportional feedback corrector. Every
//! iteration is counted into a window; once per
//! [`RECALIBRATION_TICK`](ThrottleController::RECALIBRATION_TICK) of wall
//! time the window's mean interval is compared with the target interval
//! and the per-record delay is nudged by the difference:
//!
//! ```text
//! actual = (now - window_start) / window_count
//! limit  = max(0, limit + (target - actual))
//! ```
//!
//! Running slower than target shrinks the delay; running faster grows
//! it. Recalibration is time-triggered, not count-triggered, so the
//! correction rate does not depend on the target rate.
//!
//! The controller never reads the clock itself. Callers pass `now`, which
//! keeps the algorithm deterministic under test.

use std::time::{Duration, Instant};

/// Feedback-corrected per-record delay.
#[derive(Clone, Debug)]
pub struct ThrottleController {
    target_interval: Duration,
    current_limit: Duration,
    window_count: u64,
    window_start: Instant,
    cycle_start: Instant,
    recalibrations: u64,
}

impl ThrottleController {
    /// Wall-clock interval between recalibrations.
    pub const RECALIBRATION_TICK: Duration = Duration::from_millis(1);

    /// Create a controller for `target_rate` records per second, with
    /// both the window and the first cycle starting at `now`.
    ///
    /// The target interval is `1s / (target_rate + 1)`; a rate of `0`
    /// disables pacing entirely.
    pub fn new(target_rate: u64, now: Instant) -> Self {
        let target_interval = if target_rate > 0 {
            let divisor = u32::try_from(target_rate.saturating_add(1)).unwrap_or(u32::MAX);
            Duration::from_secs(1) / divisor
        } else {
            Duration::ZERO
        };
        Self {
            target_interval,
            current_limit: target_interval,
            window_count: 0,
            window_start: now,
            cycle_start: now,
            recalibrations: 0,
        }
    }

    /// Whether pacing is disabled (`target_rate == 0`).
    pub fn is_unlimited(&self) -> bool {
        self.target_interval.is_zero()
    }

    /// The interval the controller steers toward.
    pub fn target_interval(&self) -> Duration {
        self.target_interval
    }

    /// The live per-record delay.
    pub fn current_limit(&self) -> Duration {
        self.current_limit
    }

    /// Number of recalibrations performed so far.
    pub fn recalibrations(&self) -> u64 {
        self.recalibrations
    }

    /// Count one completed iteration and recalibrate if a tick has
    /// elapsed since the last recalibration.
    pub fn record(&mut self, now: Instant) {
        self.window_count += 1;
        if now.saturating_duration_since(self.window_start) >= Self::RECALIBRATION_TICK {
            self.recalibrate(now);
        }
    }

    /// How long to sleep before the next record, given the time already
    /// spent in this cycle. `None` when no sleep is needed.
    pub fn pause(&self, now: Instant) -> Option<Duration> {
        let spent = now.saturating_duration_since(self.cycle_start);
        self.current_limit
            .checked_sub(spent)
            .filter(|remaining| !remaining.is_zero())
    }

    /// Start the next cycle at `now` (after any sleep).
    pub fn resume(&mut self, now: Instant) {
        self.cycle_start = now;
    }

    fn recalibrate(&mut self, now: Instant) {
        if self.window_count == 0 {
            return;
        }
        let elapsed = now.saturating_duration_since(self.window_start);
        let actual = mean_interval(elapsed, self.window_count);
        self.current_limit = if actual <= self.target_interval {
            self.current_limit + (self.target_interval - actual)
        } else {
            // Floors at zero.
            self.current_limit.saturating_sub(actual - self.target_interval)
        };
        self.window_start = now;
        self.window_count = 0;
        self.recalibrations += 1;
    }
}

fn mean_interval(elapsed: Duration, count: u64) -> Duration {
    let nanos = elapsed.as_nanos() / u128::from(count);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
