// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker transport adapters

mod http;

pub use http::HttpBroker;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BrokerCall, FakeBroker};

use rlock_core::{LockRequest, LockableResource, QueueTicket, ResourceFilter, TicketId, TicketUpdate};
use std::time::Duration;
use thiserror::Error;

/// Errors from broker calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// No response at all: refused, reset, DNS failure, or a failed liveness check
    #[error("broker unreachable: {0}")]
    Unreachable(String),
    /// The broker accepted the connection but did not answer in time
    #[error("broker did not answer in time")]
    Timeout,
    #[error("ticket not found: {0}")]
    TicketNotFound(TicketId),
    /// Application-level rejection, with the raw body for diagnosis
    #[error("broker returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// A success status whose body does not have the expected shape
    #[error("unexpected response from broker (status {status}): {message}")]
    Decode { status: u16, message: String },
    #[error("invalid broker url: {0}")]
    InvalidUrl(String),
}

impl BrokerError {
    /// True when the broker could not be reached or did not respond
    pub fn is_connectivity(&self) -> bool {
        matches!(self, BrokerError::Unreachable(_) | BrokerError::Timeout)
    }
}

/// Calls the client makes against the broker.
///
/// Each method is exactly one HTTP exchange; nothing here retries.
pub trait Broker: Clone + Send + Sync + 'static {
    /// Liveness check against the instance root
    fn ping(&self) -> Result<(), BrokerError>;

    /// Enqueue a lock request and return the ticket the broker assigned.
    ///
    /// `timeout` bounds only the wait for this acknowledgement.
    fn submit(
        &self,
        request: &LockRequest,
        timeout: Option<Duration>,
    ) -> Result<TicketId, BrokerError>;

    fn fetch_ticket(&self, id: &TicketId) -> Result<QueueTicket, BrokerError>;

    fn update_ticket(&self, id: &TicketId, update: &TicketUpdate) -> Result<(), BrokerError>;

    fn list_resources(&self, filter: &ResourceFilter)
        -> Result<Vec<LockableResource>, BrokerError>;

    /// Replace a resource by name, returning the broker's view of it
    fn put_resource(&self, resource: &LockableResource) -> Result<LockableResource, BrokerError>;
}
