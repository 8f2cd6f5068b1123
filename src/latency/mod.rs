//! Simulated latency: bounded random delays expressed as deadlines.
//!
//! The runtime never sleeps on behalf of a panel. A [`PendingDelay`] records
//! when it should elapse and is polled on every tick; the paired
//! [`DelayHandle`] lets the owner abandon the wait on teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::Rng;
use serde::Deserialize;

use crate::error::{ForgeError, Result};

/// Inclusive millisecond bounds for a simulated delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LatencyRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencyRange {
    pub fn new(min_ms: u64, max_ms: u64) -> Result<Self> {
        let range = Self { min_ms, max_ms };
        range.validate()?;
        Ok(range)
    }

    pub const fn fixed(ms: u64) -> Self {
        Self {
            min_ms: ms,
            max_ms: ms,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_ms > self.max_ms {
            return Err(ForgeError::Configuration(format!(
                "latency range {}..={} ms is inverted",
                self.min_ms, self.max_ms
            )));
        }
        Ok(())
    }

    /// Uniform draw in `[min_ms, max_ms]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min_ms >= self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayPoll {
    Pending { remaining: Duration },
    Elapsed,
    Cancelled,
}

/// Cancellation side of a [`PendingDelay`]. Cancelling is idempotent.
#[derive(Debug, Clone, Default)]
pub struct DelayHandle {
    cancelled: Arc<AtomicBool>,
}

impl DelayHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct PendingDelay {
    started_at: Instant,
    deadline: Instant,
    handle: DelayHandle,
}

impl PendingDelay {
    pub fn start(now: Instant, duration: Duration) -> (Self, DelayHandle) {
        let handle = DelayHandle::default();
        let delay = Self {
            started_at: now,
            deadline: now + duration,
            handle: handle.clone(),
        };
        (delay, handle)
    }

    pub fn duration(&self) -> Duration {
        self.deadline.duration_since(self.started_at)
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn poll(&self, now: Instant) -> DelayPoll {
        if self.handle.is_cancelled() {
            return DelayPoll::Cancelled;
        }
        if now >= self.deadline {
            DelayPoll::Elapsed
        } else {
            DelayPoll::Pending {
                remaining: self.deadline - now,
            }
        }
    }
}

/// Time source for the runtime loop.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to; clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now
            .lock()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}
