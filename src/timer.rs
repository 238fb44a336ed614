//! Waiting for the scheduled submission time.
//!
//! The run loop blocks here between posts. [`SleepTimer`] sleeps in short
//! ticks (the configured refresh interval) rather than one long sleep so the
//! remaining time can be displayed and a cancellation request takes effect
//! within one tick. Cancellation is cooperative: the embedder's signal
//! handler sets a shared flag and the wait resolves to [`Error::Aborted`],
//! a clean outcome distinct from failure.

use crate::config::TimerConfig;
use crate::error::{Error, Result};
use crate::output;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// The suspension point of the run loop.
pub trait WaitUntil {
    /// Block until `target`, returning immediately when it is already past.
    ///
    /// Returns `Error::Aborted` when the wait is cancelled.
    fn wait_until(&self, target: DateTime<Utc>) -> Result<()>;
}

/// Tick-based blocking timer with a countdown display.
pub struct SleepTimer {
    refresh_interval: Duration,
    cancel: Arc<AtomicBool>,
    /// Suppress the countdown display (used by tests).
    quiet: bool,
}

impl SleepTimer {
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            refresh_interval: Duration::from_millis(config.refresh_interval_ms),
            cancel: Arc::new(AtomicBool::new(false)),
            quiet: false,
        }
    }

    /// Shared cancellation flag; setting it aborts the current wait within
    /// one refresh interval.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    #[cfg(test)]
    fn quiet(config: &TimerConfig) -> Self {
        Self {
            quiet: true,
            ..Self::new(config)
        }
    }
}

impl WaitUntil for SleepTimer {
    fn wait_until(&self, target: DateTime<Utc>) -> Result<()> {
        tracing::debug!(%target, "countdown_start");

        loop {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::warn!("countdown_abort");
                return Err(Error::Aborted);
            }

            let now = Utc::now();
            if now >= target {
                if !self.quiet {
                    output::clear_countdown();
                }
                tracing::debug!("countdown_end");
                return Ok(());
            }

            if !self.quiet {
                output::print_countdown(target - now);
            }

            let remaining = (target - now)
                .to_std()
                .unwrap_or(Duration::ZERO)
                .min(self.refresh_interval);
            std::thread::sleep(remaining);
        }
    }
}
