// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock request submission
//!
//! Exactly one PUT per call. A submission that timed out may still have
//! registered a ticket, so nothing here retries.

use crate::LockError;
use rlock_adapters::{Broker, BrokerError};
use rlock_core::{LockRequest, TicketId};
use std::time::Duration;

/// Enqueue `request` and return the broker-assigned ticket id.
///
/// `timeout` bounds only the wait for the broker's acknowledgement.
pub fn submit<B: Broker>(
    broker: &B,
    request: &LockRequest,
    timeout: Option<Duration>,
) -> Result<TicketId, LockError> {
    if request.search_key.trim().is_empty() {
        return Err(LockError::InvalidRequest("search key is empty".to_string()));
    }
    if request.signoff.trim().is_empty() {
        return Err(LockError::InvalidRequest("signoff is empty".to_string()));
    }

    match broker.submit(request, timeout) {
        Ok(id) => {
            tracing::info!(
                ticket_id = %id,
                search_key = %request.search_key,
                signoff = %request.signoff,
                priority = request.priority,
                "lock request queued"
            );
            Ok(id)
        }
        Err(BrokerError::Timeout) => Err(LockError::LockTimeout(timeout)),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
