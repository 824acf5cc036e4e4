// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling

use crate::cancel::CancelToken;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A clock that provides the current time and blocking waits
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;

    /// Wall-clock time, used for heartbeat timestamps
    fn utc_now(&self) -> DateTime<Utc>;

    /// Wait for `duration` unless `cancel` fires first.
    ///
    /// Returns `true` if the wait was cut short by cancellation.
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool;
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        cancel.wait(duration)
    }
}

struct FakeState {
    current: Instant,
    wall: DateTime<Utc>,
    sleeps: Vec<Duration>,
    cancel_after: Option<(usize, CancelToken)>,
}

/// Fake clock for testing with controllable time
///
/// Sleeping advances the clock instantly and records the requested duration.
#[derive(Clone)]
pub struct FakeClock {
    state: Arc<Mutex<FakeState>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                current: Instant::now(),
                wall: DateTime::<Utc>::default(),
                sleeps: Vec::new(),
                cancel_after: None,
            })),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut state = self.state();
        if let Some(current) = state.current.checked_add(duration) {
            state.current = current;
        }
        let wall = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|delta| state.wall.checked_add_signed(delta));
        if let Some(wall) = wall {
            state.wall = wall;
        }
    }

    /// Set the wall-clock time reported by `utc_now`
    pub fn set_utc(&self, wall: DateTime<Utc>) {
        self.state().wall = wall;
    }

    /// Durations passed to `sleep`, in call order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state().sleeps.clone()
    }

    /// Sum of all recorded sleeps
    pub fn total_slept(&self) -> Duration {
        self.state().sleeps.iter().sum()
    }

    /// Cancel `token` once `count` sleeps have been recorded
    pub fn cancel_after(&self, count: usize, token: CancelToken) {
        self.state().cancel_after = Some((count, token));
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.state().current
    }

    fn utc_now(&self) -> DateTime<Utc> {
        self.state().wall
    }

    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            return true;
        }
        self.advance(duration);
        let trigger = {
            let mut state = self.state();
            state.sleeps.push(duration);
            match &state.cancel_after {
                Some((count, token)) if state.sleeps.len() >= *count => Some(token.clone()),
                _ => None,
            }
        };
        if let Some(token) = trigger {
            token.cancel();
        }
        cancel.is_cancelled()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
