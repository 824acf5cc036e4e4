// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the lock protocol

use rlock_adapters::BrokerError;
use rlock_core::{QueueTicket, TicketId};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by lock acquisition and completion tracking
#[derive(Debug, Error)]
pub enum LockError {
    /// The broker could not be reached at all
    #[error("broker unreachable: {0}")]
    Connectivity(String),

    /// The broker did not acknowledge a lock request in time.
    ///
    /// Distinct from [`LockError::AcquisitionTimeout`]: a ticket may or may
    /// not have been registered.
    #[error("broker did not acknowledge the lock request{}", fmt_within(.0))]
    LockTimeout(Option<Duration>),

    /// The attempt budget ran out while the ticket was still pending
    #[error(
        "ticket {ticket_id} still pending after {attempts} attempts ({})",
        fmt_budget(.interval, .attempts)
    )]
    AcquisitionTimeout {
        ticket_id: TicketId,
        attempts: u32,
        interval: Duration,
    },

    /// The broker marked the ticket ABORTED or FAILED
    #[error("ticket {} ended as {}{}", .ticket.id, .ticket.status, fmt_reason(.ticket))]
    QueueTerminated { ticket: Box<QueueTicket> },

    /// The broker does not know this ticket; never retried
    #[error("ticket not known to broker: {0}")]
    InvalidTicket(TicketId),

    /// Non-success response from the broker, with its raw body
    #[error("broker returned status {status}: {body}")]
    BrokerApplication { status: u16, body: String },

    #[error("no resource named {0}")]
    NoSuchResource(String),

    #[error("invalid lock request: {0}")]
    InvalidRequest(String),

    #[error("invalid broker url: {0}")]
    InvalidUrl(String),

    /// Cancellation was requested while waiting
    #[error("cancelled")]
    Cancelled,

    #[error("ticket record: {0}")]
    Io(#[from] std::io::Error),
}

impl LockError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, LockError::Connectivity(_))
    }
}

impl From<BrokerError> for LockError {
    fn from(err: BrokerError) -> Self {
        match err {
            BrokerError::Unreachable(message) => LockError::Connectivity(message),
            BrokerError::Timeout => {
                LockError::Connectivity("broker did not answer in time".to_string())
            }
            BrokerError::TicketNotFound(id) => LockError::InvalidTicket(id),
            BrokerError::Status { status, body } => LockError::BrokerApplication { status, body },
            BrokerError::Decode { status, message } => LockError::BrokerApplication {
                status,
                body: message,
            },
            BrokerError::InvalidUrl(url) => LockError::InvalidUrl(url),
        }
    }
}

/// Total wait implied by an attempt budget
pub fn budget(interval: Duration, attempts: u32) -> Duration {
    interval.saturating_mul(attempts)
}

fn fmt_budget(interval: &Duration, attempts: &u32) -> String {
    format!(
        "{} at {} intervals",
        humantime::format_duration(budget(*interval, *attempts)),
        humantime::format_duration(*interval)
    )
}

fn fmt_within(timeout: &Option<Duration>) -> String {
    match timeout {
        Some(t) => format!(" within {}", humantime::format_duration(*t)),
        None => String::new(),
    }
}

fn fmt_reason(ticket: &QueueTicket) -> String {
    match &ticket.description {
        Some(description) => format!(": {description}"),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
