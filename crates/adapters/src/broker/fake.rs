// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake broker for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Broker, BrokerError};
use rlock_core::{
    CancelToken, LockRequest, LockableResource, QueueTicket, ResourceFilter, TicketId, TicketStatus,
    TicketUpdate,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded broker call
#[derive(Debug, Clone, PartialEq)]
pub enum BrokerCall {
    Ping,
    Submit {
        request: LockRequest,
        timeout: Option<Duration>,
    },
    FetchTicket {
        id: TicketId,
    },
    UpdateTicket {
        id: TicketId,
        update: TicketUpdate,
    },
    ListResources {
        filter: ResourceFilter,
    },
    PutResource {
        resource: LockableResource,
    },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<BrokerCall>,
    /// Number of upcoming pings that fail
    failing_pings: usize,
    /// While set, every call fails as unreachable
    down: bool,
    submit_result: Option<Result<TicketId, BrokerError>>,
    /// Scripted ticket observations; the last one repeats
    tickets: VecDeque<Result<QueueTicket, BrokerError>>,
    update_error: Option<BrokerError>,
    resources: Vec<LockableResource>,
    put_error: Option<BrokerError>,
    /// Signal delivered during the next ping or fetch
    interrupt_ping: Option<CancelToken>,
    interrupt_fetch: Option<CancelToken>,
}

/// Scriptable in-memory broker with call recording
#[derive(Clone, Default)]
pub struct FakeBroker {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<BrokerCall> {
        self.state().calls.clone()
    }

    /// Ticket updates recorded so far, in order
    pub fn updates(&self) -> Vec<(TicketId, TicketUpdate)> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                BrokerCall::UpdateTicket { id, update } => Some((id.clone(), update.clone())),
                _ => None,
            })
            .collect()
    }

    /// Number of heartbeat updates recorded
    pub fn beat_count(&self) -> usize {
        self.updates()
            .iter()
            .filter(|(_, update)| matches!(update, TicketUpdate::Beat { .. }))
            .count()
    }

    /// Number of ticket fetches recorded
    pub fn fetch_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, BrokerCall::FetchTicket { .. }))
            .count()
    }

    /// Make every call fail as unreachable until cleared
    pub fn set_down(&self, down: bool) {
        self.state().down = down;
    }

    /// Fail the next `count` pings, then answer normally
    pub fn fail_pings(&self, count: usize) {
        self.state().failing_pings = count;
    }

    /// Ticket id (or error) returned by `submit`
    pub fn on_submit(&self, result: Result<TicketId, BrokerError>) {
        self.state().submit_result = Some(result);
    }

    /// Queue one observation per status for ticket `id`
    pub fn script_statuses(&self, id: &str, statuses: &[TicketStatus]) {
        let mut state = self.state();
        for status in statuses {
            state.tickets.push_back(Ok(QueueTicket::new(id, *status)));
        }
    }

    /// Queue an arbitrary observation
    pub fn push_ticket(&self, result: Result<QueueTicket, BrokerError>) {
        self.state().tickets.push_back(result);
    }

    /// Error returned by every subsequent `update_ticket`
    pub fn fail_updates(&self, error: Option<BrokerError>) {
        self.state().update_error = error;
    }

    pub fn add_resource(&self, resource: LockableResource) {
        self.state().resources.push(resource);
    }

    pub fn resource(&self, name: &str) -> Option<LockableResource> {
        self.state()
            .resources
            .iter()
            .find(|r| r.name == name)
            .cloned()
    }

    /// Error returned by every subsequent `put_resource`
    pub fn fail_puts(&self, error: Option<BrokerError>) {
        self.state().put_error = error;
    }

    /// Cancel `token` during the next ping, which then fails as an
    /// interrupted call
    pub fn interrupt_ping(&self, token: CancelToken) {
        self.state().interrupt_ping = Some(token);
    }

    /// Cancel `token` during the next ticket fetch, which then fails as an
    /// interrupted call
    pub fn interrupt_fetch(&self, token: CancelToken) {
        self.state().interrupt_fetch = Some(token);
    }

    fn record(&self, call: BrokerCall) -> Result<(), BrokerError> {
        let mut state = self.state();
        state.calls.push(call);
        if state.down {
            return Err(BrokerError::Unreachable("connection refused".to_string()));
        }
        Ok(())
    }
}

fn interrupted(token: CancelToken) -> BrokerError {
    token.cancel();
    BrokerError::Unreachable("io: Interrupted system call (os error 4)".to_string())
}

fn matches_filter(resource: &LockableResource, filter: &ResourceFilter) -> bool {
    let name_ok = filter.name.as_ref().is_none_or(|n| &resource.name == n);
    let signoff_ok = filter
        .signoff
        .as_ref()
        .is_none_or(|s| resource.signoff.as_ref() == Some(s));
    let locked_ok = filter.is_locked.is_none_or(|l| resource.is_locked == l);
    let label_ok = filter.label_matches.as_ref().is_none_or(|pattern| {
        resource.labels.iter().any(|label| match pattern.strip_suffix('*') {
            Some(prefix) => label.starts_with(prefix),
            None => label == pattern,
        })
    });
    name_ok && signoff_ok && locked_ok && label_ok
}

impl Broker for FakeBroker {
    fn ping(&self) -> Result<(), BrokerError> {
        self.record(BrokerCall::Ping)?;
        let mut state = self.state();
        if let Some(token) = state.interrupt_ping.take() {
            return Err(interrupted(token));
        }
        if state.failing_pings > 0 {
            state.failing_pings -= 1;
            return Err(BrokerError::Unreachable("connection refused".to_string()));
        }
        Ok(())
    }

    fn submit(
        &self,
        request: &LockRequest,
        timeout: Option<Duration>,
    ) -> Result<TicketId, BrokerError> {
        self.record(BrokerCall::Submit {
            request: request.clone(),
            timeout,
        })?;
        self.state()
            .submit_result
            .clone()
            .unwrap_or_else(|| Ok(TicketId::new("1")))
    }

    fn fetch_ticket(&self, id: &TicketId) -> Result<QueueTicket, BrokerError> {
        self.record(BrokerCall::FetchTicket { id: id.clone() })?;
        let mut state = self.state();
        if let Some(token) = state.interrupt_fetch.take() {
            return Err(interrupted(token));
        }
        let next = if state.tickets.len() > 1 {
            state.tickets.pop_front()
        } else {
            state.tickets.front().cloned()
        };
        next.unwrap_or_else(|| Err(BrokerError::TicketNotFound(id.clone())))
    }

    fn update_ticket(&self, id: &TicketId, update: &TicketUpdate) -> Result<(), BrokerError> {
        self.record(BrokerCall::UpdateTicket {
            id: id.clone(),
            update: update.clone(),
        })?;
        match self.state().update_error.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn list_resources(
        &self,
        filter: &ResourceFilter,
    ) -> Result<Vec<LockableResource>, BrokerError> {
        self.record(BrokerCall::ListResources {
            filter: filter.clone(),
        })?;
        Ok(self
            .state()
            .resources
            .iter()
            .filter(|r| matches_filter(r, filter))
            .cloned()
            .collect())
    }

    fn put_resource(&self, resource: &LockableResource) -> Result<LockableResource, BrokerError> {
        self.record(BrokerCall::PutResource {
            resource: resource.clone(),
        })?;
        let mut state = self.state();
        if let Some(error) = state.put_error.clone() {
            return Err(error);
        }
        match state.resources.iter_mut().find(|r| r.name == resource.name) {
            Some(existing) => *existing = resource.clone(),
            None => state.resources.push(resource.clone()),
        }
        Ok(resource.clone())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
