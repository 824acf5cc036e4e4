// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker-bound client facade

use crate::cancel;
use crate::guard::{ensure_reachable, wait_until_reachable};
use crate::poller::{PollOptions, Poller};
use crate::resources::{self, CheckResult};
use crate::submit;
use crate::LockError;
use rlock_adapters::Broker;
use rlock_core::{
    CancelToken, Clock, LockRequest, LockableResource, QueueTicket, ResourceFilter, TicketId,
    TicketStatus,
};
use std::time::Duration;

/// A client for one broker, verified reachable at construction
#[derive(Clone)]
pub struct LockerClient<B, C> {
    broker: B,
    clock: C,
}

impl<B: Broker, C: Clock> LockerClient<B, C> {
    /// Connect, failing fast when the broker does not answer
    pub fn connect(broker: B, clock: C) -> Result<Self, LockError> {
        ensure_reachable(&broker)?;
        Ok(Self { broker, clock })
    }

    /// Connect, waiting out an outage at `interval` until the broker answers
    pub fn connect_waiting(
        broker: B,
        clock: C,
        interval: Duration,
        cancel: &CancelToken,
    ) -> Result<Self, LockError> {
        if let Err(e) = ensure_reachable(&broker) {
            tracing::warn!(error = %e, "broker unreachable, waiting for it to come up");
            wait_until_reachable(&broker, &clock, interval, cancel)?;
        }
        Ok(Self { broker, clock })
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    pub fn submit(
        &self,
        request: &LockRequest,
        timeout: Option<Duration>,
    ) -> Result<TicketId, LockError> {
        submit::submit(&self.broker, request, timeout)
    }

    /// Poller over this client's broker and clock
    pub fn poller(&self, options: PollOptions) -> Poller<'_, B, C> {
        Poller::new(&self.broker, &self.clock, options)
    }

    pub fn await_completion(
        &self,
        ticket_id: &TicketId,
        options: PollOptions,
    ) -> Result<Option<QueueTicket>, LockError> {
        self.poller(options).await_completion(ticket_id)
    }

    pub fn abort(&self, ticket_id: &TicketId, reason: &str) -> Result<(), LockError> {
        cancel::abort(&self.broker, ticket_id, reason)
    }

    pub fn change_status(&self, ticket_id: &TicketId, status: TicketStatus) -> Result<(), LockError> {
        cancel::change_status(&self.broker, ticket_id, status)
    }

    pub fn list_resources(&self, filter: &ResourceFilter) -> Result<Vec<LockableResource>, LockError> {
        resources::list_resources(&self.broker, filter)
    }

    pub fn check(&self, search: &str) -> Result<CheckResult, LockError> {
        resources::check(&self.broker, search)
    }

    pub fn release_by_signoff(&self, signoff: &str) -> Result<Option<LockableResource>, LockError> {
        resources::release_by_signoff(&self.broker, signoff)
    }

    /// Lock the named resource directly under `signoff`
    pub fn lock_resource(
        &self,
        name: &str,
        signoff: &str,
        link: Option<String>,
    ) -> Result<LockableResource, LockError> {
        let resource = resources::find_resource(&self.broker, name)?;
        resources::lock_resource(&self.broker, &resource, signoff, link)
    }

    /// Unlock the named resource directly
    pub fn unlock_resource(&self, name: &str) -> Result<LockableResource, LockError> {
        let resource = resources::find_resource(&self.broker, name)?;
        resources::unlock_resource(&self.broker, &resource)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
