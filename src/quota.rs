//! Process-wide request quota with a fixed, lazily reset window.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Counter and the instant the current window opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    pub count: u32,
    pub window_start: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Request limit reached")]
pub struct QuotaExceeded {
    /// Time left until the window resets.
    pub retry_after: Duration,
}

impl QuotaExceeded {
    /// Whole seconds, rounded up, suitable for a `Retry-After` header.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.retry_after.as_secs();
        if self.retry_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }
}

/// Point-in-time view of the gate for the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub count: u32,
    pub limit: u32,
    pub remaining: Duration,
}

/// Admits at most `limit` requests per `reset_interval`.
///
/// The window resets lazily when a call observes that it has elapsed, so no
/// background task is needed. Every read-modify-write happens under a single
/// lock, which keeps concurrent callers from overshooting the ceiling.
#[derive(Debug)]
pub struct QuotaGate {
    limit: u32,
    reset_interval: Duration,
    state: Mutex<QuotaState>,
}

impl QuotaGate {
    pub fn new(limit: u32, reset_interval: Duration) -> Self {
        Self::starting_at(limit, reset_interval, Instant::now())
    }

    /// Create a gate whose first window opens at `window_start`.
    pub fn starting_at(limit: u32, reset_interval: Duration, window_start: Instant) -> Self {
        Self {
            limit,
            reset_interval,
            state: Mutex::new(QuotaState {
                count: 0,
                window_start,
            }),
        }
    }

    /// Report whether a request would be admitted, without consuming quota.
    pub fn check(&self) -> Result<(), QuotaExceeded> {
        self.check_at(Instant::now())
    }

    pub fn check_at(&self, now: Instant) -> Result<(), QuotaExceeded> {
        let mut state = self.lock();
        self.roll_window(&mut state, now);
        self.ensure_capacity(&state, now)
    }

    /// Admit and count one request. Returns the count including this request.
    pub fn try_acquire(&self) -> Result<u32, QuotaExceeded> {
        self.try_acquire_at(Instant::now())
    }

    pub fn try_acquire_at(&self, now: Instant) -> Result<u32, QuotaExceeded> {
        let mut state = self.lock();
        self.roll_window(&mut state, now);
        self.ensure_capacity(&state, now)?;
        state.count += 1;
        Ok(state.count)
    }

    pub fn snapshot(&self) -> QuotaSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> QuotaSnapshot {
        let mut state = self.lock();
        self.roll_window(&mut state, now);
        QuotaSnapshot {
            count: state.count,
            limit: self.limit,
            remaining: self.remaining(&state, now),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QuotaState> {
        // The state is two plain fields; a panicked holder cannot leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn roll_window(&self, state: &mut QuotaState, now: Instant) {
        if now.saturating_duration_since(state.window_start) >= self.reset_interval {
            state.count = 0;
            state.window_start = now;
        }
    }

    fn ensure_capacity(&self, state: &QuotaState, now: Instant) -> Result<(), QuotaExceeded> {
        if state.count >= self.limit {
            return Err(QuotaExceeded {
                retry_after: self.remaining(state, now),
            });
        }
        Ok(())
    }

    fn remaining(&self, state: &QuotaState, now: Instant) -> Duration {
        self.reset_interval
            .saturating_sub(now.saturating_duration_since(state.window_start))
    }
}
