// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection guard
//!
//! Turns "no response" into an explicit connectivity fault before any
//! protocol step relies on the broker.

use crate::LockError;
use rlock_adapters::{Broker, BrokerError};
use rlock_core::{CancelToken, Clock};
use std::time::Duration;

/// Ping the broker once; any failure is a connectivity fault
pub fn ensure_reachable<B: Broker>(broker: &B) -> Result<(), LockError> {
    broker.ping().map_err(|e| match e {
        BrokerError::Unreachable(reason) => LockError::Connectivity(reason),
        other => LockError::Connectivity(other.to_string()),
    })
}

/// Ping until the broker answers, sleeping `interval` between pings.
///
/// Unbounded; only cancellation ends it early. Returns the number of sleep
/// cycles spent waiting.
pub fn wait_until_reachable<B: Broker, C: Clock>(
    broker: &B,
    clock: &C,
    interval: Duration,
    cancel: &CancelToken,
) -> Result<u32, LockError> {
    let mut cycles = 0u32;
    loop {
        if clock.sleep(interval, cancel) {
            return Err(LockError::Cancelled);
        }
        cycles = cycles.saturating_add(1);
        match ensure_reachable(broker) {
            Ok(()) => {
                tracing::info!(cycles, "broker reachable again");
                return Ok(cycles);
            }
            Err(e) => tracing::warn!(
                cycles,
                retry_in = %humantime::format_duration(interval),
                error = %e,
                "broker still unreachable"
            ),
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
