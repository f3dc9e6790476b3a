// SPDX-License-Identifier: MIT

//! Clock abstraction.
//!
//! Retry backoff, watchdog poll intervals, and task-attempt bookkeeping all
//! depend on elapsed time. Routing every read through this trait keeps those
//! code paths deterministic in tests instead of sleeping for real.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of the current instant and epoch milliseconds.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn epoch_ms(&self) -> u64;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Deterministic clock for tests: `now()` is a fixed base plus an
/// explicitly-advanced offset; `epoch_ms()` is a counter that starts at a
/// configurable value and is advanced the same way.
#[derive(Clone)]
pub struct FakeClock {
    base: Instant,
    offset_ms: std::sync::Arc<AtomicU64>,
    epoch_base_ms: u64,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_ms: std::sync::Arc::new(AtomicU64::new(0)),
            epoch_base_ms: 0,
        }
    }

    pub fn at_epoch_ms(epoch_base_ms: u64) -> Self {
        Self {
            base: Instant::now(),
            offset_ms: std::sync::Arc::new(AtomicU64::new(0)),
            epoch_base_ms,
        }
    }

    /// Advance the fake clock by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.offset_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }

    fn epoch_ms(&self) -> u64 {
        self.epoch_base_ms + self.offset_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
