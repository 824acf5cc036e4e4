// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced broker wrapper for consistent observability

use crate::broker::{Broker, BrokerError};
use rlock_core::{
    LockRequest, LockableResource, QueueTicket, ResourceFilter, TicketId, TicketUpdate,
};
use std::time::{Duration, Instant};

/// Wrapper that adds tracing to any Broker
#[derive(Clone)]
pub struct TracedBroker<B> {
    inner: B,
}

impl<B> TracedBroker<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn elapsed_ms(start: Instant) -> u64 {
    millis(start.elapsed())
}

impl<B: Broker> Broker for TracedBroker<B> {
    fn ping(&self) -> Result<(), BrokerError> {
        let start = Instant::now();
        let result = self.inner.ping();
        match &result {
            Ok(()) => tracing::trace!(elapsed_ms = elapsed_ms(start), "broker reachable"),
            Err(e) => tracing::warn!(error = %e, "broker ping failed"),
        }
        result
    }

    fn submit(
        &self,
        request: &LockRequest,
        timeout: Option<Duration>,
    ) -> Result<TicketId, BrokerError> {
        let span = tracing::info_span!(
            "broker.submit",
            search_key = %request.search_key,
            signoff = %request.signoff,
            priority = request.priority
        );
        let _guard = span.enter();

        tracing::debug!(timeout_ms = timeout.map(millis), "submitting");
        let start = Instant::now();
        let result = self.inner.submit(request, timeout);

        match &result {
            Ok(id) => tracing::info!(
                ticket_id = %id,
                elapsed_ms = elapsed_ms(start),
                "ticket assigned"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed_ms(start),
                error = %e,
                "submit failed"
            ),
        }

        result
    }

    fn fetch_ticket(&self, id: &TicketId) -> Result<QueueTicket, BrokerError> {
        let span = tracing::debug_span!("broker.fetch_ticket", ticket_id = %id);
        let _guard = span.enter();

        let result = self.inner.fetch_ticket(id);
        match &result {
            Ok(ticket) => tracing::debug!(status = %ticket.status, "observed"),
            Err(e) => tracing::warn!(error = %e, "fetch failed"),
        }
        result
    }

    fn update_ticket(&self, id: &TicketId, update: &TicketUpdate) -> Result<(), BrokerError> {
        let span = tracing::info_span!("broker.update_ticket", ticket_id = %id, kind = update.kind());
        let _guard = span.enter();

        let result = self.inner.update_ticket(id, update);
        // Beat and abort failures are tolerated by callers
        match &result {
            Ok(()) => tracing::debug!("updated"),
            Err(e) => tracing::warn!(error = %e, "update failed"),
        }
        result
    }

    fn list_resources(
        &self,
        filter: &ResourceFilter,
    ) -> Result<Vec<LockableResource>, BrokerError> {
        let span = tracing::debug_span!("broker.list_resources", filter = ?filter.query_pairs());
        let _guard = span.enter();

        let result = self.inner.list_resources(filter);
        match &result {
            Ok(resources) => tracing::debug!(count = resources.len(), "listed"),
            Err(e) => tracing::error!(error = %e, "list failed"),
        }
        result
    }

    fn put_resource(&self, resource: &LockableResource) -> Result<LockableResource, BrokerError> {
        let span = tracing::info_span!(
            "broker.put_resource",
            name = %resource.name,
            is_locked = resource.is_locked
        );
        let _guard = span.enter();

        let result = self.inner.put_resource(resource);
        match &result {
            Ok(_) => tracing::info!("resource updated"),
            Err(e) => tracing::error!(error = %e, "put failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
