//! Simulated progress for the generation request.
//!
//! The image service reports nothing while it works, so the progress bar is driven purely by
//! wall-clock time along an ease-out-cubic curve. The numbers produced here are cosmetic: they
//! say nothing about how far the real request has gotten. The curve is capped below 100 so
//! that the final jump is reserved for the moment the response actually arrives.

use std::time::Duration;

pub const DEFAULT_TOTAL_ESTIMATE_SECS: f64 = 20.0;
pub const DEFAULT_CEILING: f64 = 95.0;
const MAX_NORMALIZED_TIME: f64 = 0.95;
const FALLBACK_RATE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEstimator {
    total_estimate_secs: f64,
    ceiling: f64,
}

impl Default for ProgressEstimator {
    fn default() -> Self {
        Self {
            total_estimate_secs: DEFAULT_TOTAL_ESTIMATE_SECS,
            ceiling: DEFAULT_CEILING,
        }
    }
}

impl ProgressEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_total_estimate(mut self, total: Duration) -> Self {
        let secs = total.as_secs_f64();
        if secs > 0.0 {
            self.total_estimate_secs = secs;
        }
        self
    }

    pub fn total_estimate_secs(&self) -> f64 {
        self.total_estimate_secs
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Percentage in `[0, ceiling]` after `elapsed_secs` seconds. Non-decreasing in time.
    pub fn progress_at(&self, elapsed_secs: f64) -> f64 {
        let elapsed = sanitize(elapsed_secs);
        let normalized = (elapsed / self.total_estimate_secs).min(MAX_NORMALIZED_TIME);
        let eased = 1.0 - (1.0 - normalized).powi(3);
        (eased * self.ceiling).clamp(0.0, self.ceiling)
    }

    /// Whole seconds left, projected from the average rate so far. At least 1 while there is
    /// headroom under the ceiling, 0 otherwise.
    pub fn estimated_remaining_secs(&self, progress: f64, elapsed_secs: f64) -> u64 {
        if progress >= self.ceiling {
            return 0;
        }

        let remaining = self.ceiling - progress;
        let elapsed = sanitize(elapsed_secs);
        let rate = if elapsed > 0.0 { progress / elapsed } else { 0.0 };
        let rate = if rate > 0.0 && rate.is_finite() {
            rate
        } else {
            FALLBACK_RATE
        };

        ((remaining / rate).ceil() as u64).max(1)
    }

    /// Convenience pair used by the progress ticker.
    pub fn sample(&self, elapsed: Duration) -> (f64, u64) {
        let secs = elapsed.as_secs_f64();
        let progress = self.progress_at(secs);
        (progress, self.estimated_remaining_secs(progress, secs))
    }

    /// Remaining-time figure shown before the first tick.
    pub fn initial_estimate_secs(&self) -> u64 {
        self.total_estimate_secs.ceil() as u64
    }
}

fn sanitize(elapsed_secs: f64) -> f64 {
    if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
        elapsed_secs
    } else {
        0.0
    }
}
