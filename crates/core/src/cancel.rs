// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative cancellation for blocking waits
//!
//! A signal handler flips the token; any thread parked in [`CancelToken::wait`]
//! wakes immediately instead of sleeping out its interval.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Default)]
struct Inner {
    cancelled: Mutex<bool>,
    wakeup: Condvar,
}

/// Shared cancellation flag. Clones observe the same state.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake every waiter.
    ///
    /// Returns `true` if this call flipped the token, `false` if it was
    /// already cancelled.
    pub fn cancel(&self) -> bool {
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let first = !*cancelled;
        *cancelled = true;
        self.inner.wakeup.notify_all();
        first
    }

    pub fn is_cancelled(&self) -> bool {
        *self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Block for up to `duration`, returning early if cancelled.
    ///
    /// Returns `true` when the wait ended because of cancellation.
    /// A duration too large to express as a deadline waits for cancellation
    /// alone.
    pub fn wait(&self, duration: Duration) -> bool {
        let deadline = Instant::now().checked_add(duration);
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(|e| e.into_inner());

        // Loop guards against spurious wakeups
        while !*cancelled {
            cancelled = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    self.inner
                        .wakeup
                        .wait_timeout(cancelled, deadline - now)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
                None => self
                    .inner
                    .wakeup
                    .wait(cancelled)
                    .unwrap_or_else(|e| e.into_inner()),
            };
        }
        true
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
