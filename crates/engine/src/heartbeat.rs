// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client liveness heartbeat

use rlock_adapters::Broker;
use rlock_core::{Clock, TicketId, TicketUpdate};

/// Stamp the ticket's last beat with the current UTC time.
///
/// Failures are logged and dropped; a broker that is really down shows up
/// on the next connectivity check.
pub fn beat<B: Broker, C: Clock>(broker: &B, clock: &C, ticket_id: &TicketId) {
    let at = clock.utc_now();
    match broker.update_ticket(ticket_id, &TicketUpdate::beat(at)) {
        Ok(()) => tracing::debug!(ticket_id = %ticket_id, last_beat = %at, "heartbeat sent"),
        Err(e) => tracing::warn!(ticket_id = %ticket_id, error = %e, "heartbeat failed"),
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
