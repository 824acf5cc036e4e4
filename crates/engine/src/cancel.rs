// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket transitions requested by the client, and cleanup on termination

use crate::LockError;
use rlock_adapters::Broker;
use rlock_core::{CancelToken, TicketId, TicketStatus, TicketUpdate};
use std::sync::{Mutex, MutexGuard};

/// Reason recorded when the client is stopped while waiting
pub const CANCEL_REASON: &str =
    "Queue has been aborted in the middle of a CI/CD Pipeline or during manual execution.";

/// Mark the ticket ABORTED with a human-readable reason
pub fn abort<B: Broker>(broker: &B, ticket_id: &TicketId, reason: &str) -> Result<(), LockError> {
    broker.update_ticket(ticket_id, &TicketUpdate::abort(reason))?;
    tracing::info!(ticket_id = %ticket_id, reason, "ticket aborted");
    Ok(())
}

/// Abort once, logging instead of failing. Returns whether the broker
/// accepted the abort.
pub fn try_abort<B: Broker>(broker: &B, ticket_id: &TicketId, reason: &str) -> bool {
    match abort(broker, ticket_id, reason) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(ticket_id = %ticket_id, error = %e, "abort failed");
            false
        }
    }
}

/// Request an arbitrary status transition on a ticket
pub fn change_status<B: Broker>(
    broker: &B,
    ticket_id: &TicketId,
    status: TicketStatus,
) -> Result<(), LockError> {
    broker.update_ticket(ticket_id, &TicketUpdate::status(status))?;
    tracing::info!(ticket_id = %ticket_id, %status, "ticket status changed");
    Ok(())
}

/// Aborts the outstanding ticket when the process is told to stop.
///
/// The signal handler only flips [`CancellationHandler::token`]; the owner of
/// the poll loop calls [`CancellationHandler::cancel_outstanding`] after the
/// loop returns [`LockError::Cancelled`].
pub struct CancellationHandler<B> {
    broker: B,
    token: CancelToken,
    armed: Mutex<Option<TicketId>>,
}

impl<B: Broker> CancellationHandler<B> {
    pub fn new(broker: B, token: CancelToken) -> Self {
        Self {
            broker,
            token,
            armed: Mutex::new(None),
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    fn armed(&self) -> MutexGuard<'_, Option<TicketId>> {
        self.armed.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Track `ticket_id` as the outstanding ticket
    pub fn arm(&self, ticket_id: TicketId) {
        tracing::debug!(ticket_id = %ticket_id, "cancellation handler armed");
        *self.armed() = Some(ticket_id);
    }

    /// Stop tracking; the ticket settled
    pub fn disarm(&self) -> Option<TicketId> {
        self.armed().take()
    }

    pub fn is_armed(&self) -> bool {
        self.armed().is_some()
    }

    /// Abort the outstanding ticket once, if any.
    ///
    /// Returns the ticket that an abort was attempted for. Never retries.
    pub fn cancel_outstanding(&self) -> Option<TicketId> {
        let ticket_id = self.disarm()?;
        tracing::info!(ticket_id = %ticket_id, "cancelling outstanding ticket");
        try_abort(&self.broker, &ticket_id, CANCEL_REASON);
        Some(ticket_id)
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
