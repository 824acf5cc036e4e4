// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion poller
//!
//! Drives a queue ticket to a terminal state under an `attempts × interval`
//! budget. Outage recovery runs outside that budget: an attempt that hit a
//! connectivity fault is retried at the same index once the broker answers.

use crate::cancel::try_abort;
use crate::error::budget;
use crate::guard::{ensure_reachable, wait_until_reachable};
use crate::heartbeat::beat;
use crate::LockError;
use rlock_adapters::Broker;
use rlock_core::{CancelToken, Clock, QueueTicket, TicketId, TicketStatus};
use std::time::Duration;

/// Reason recorded on a ticket aborted because the budget ran out
pub const TIMEOUT_REASON: &str = "Lock acquisition timed out on the client side.";

/// How long and how to wait for a ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub attempts: u32,
    /// Abort the ticket once the budget is exhausted
    pub abort_on_timeout: bool,
    /// Wait out broker outages instead of failing
    pub resume_on_connection_error: bool,
    /// Return `None` instead of failing on timeout or termination
    pub silent: bool,
}

impl PollOptions {
    pub fn new(interval: Duration, attempts: u32) -> Self {
        Self {
            interval,
            attempts,
            abort_on_timeout: false,
            resume_on_connection_error: false,
            silent: false,
        }
    }

    pub fn abort_on_timeout(mut self, enabled: bool) -> Self {
        self.abort_on_timeout = enabled;
        self
    }

    pub fn resume_on_connection_error(mut self, enabled: bool) -> Self {
        self.resume_on_connection_error = enabled;
        self
    }

    pub fn silent(mut self, enabled: bool) -> Self {
        self.silent = enabled;
        self
    }

    /// Total polling wait, excluding outage recovery
    pub fn budget(&self) -> Duration {
        budget(self.interval, self.attempts)
    }
}

/// Poll loop state
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// Ticket INITIALIZING or PENDING; `attempt` is the next attempt index
    Waiting { attempt: u32 },
    /// Broker unreachable; `attempt` is resumed unchanged afterwards
    Recovering { attempt: u32 },
    Succeeded(QueueTicket),
    FailedTerminal(QueueTicket),
    TimedOut,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Succeeded(_) | PollState::FailedTerminal(_) | PollState::TimedOut
        )
    }
}

/// Progress notifications for the operator
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Started {
        ticket_id: TicketId,
        attempts: u32,
        interval: Duration,
    },
    StillWaiting {
        attempt: u32,
        status: TicketStatus,
    },
    ConnectionLost {
        attempt: u32,
        error: String,
    },
    Reconnected {
        attempt: u32,
        cycles: u32,
    },
    TimedOut {
        aborted: bool,
    },
}

type Observer<'a> = Box<dyn FnMut(&PollEvent) + 'a>;

/// Blocking poll loop over one ticket
pub struct Poller<'a, B, C> {
    broker: &'a B,
    clock: &'a C,
    options: PollOptions,
    cancel: CancelToken,
    observer: Option<Observer<'a>>,
}

impl<'a, B: Broker, C: Clock> Poller<'a, B, C> {
    pub fn new(broker: &'a B, clock: &'a C, options: PollOptions) -> Self {
        Self {
            broker,
            clock,
            options,
            cancel: CancelToken::new(),
            observer: None,
        }
    }

    /// Observe `cancel` during every wait
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_observer(mut self, observer: impl FnMut(&PollEvent) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Poll `ticket_id` until it settles or the budget runs out.
    ///
    /// Returns the FINISHED ticket, or `None` in silent mode when the ticket
    /// timed out or was terminated by the broker.
    pub fn await_completion(
        &mut self,
        ticket_id: &TicketId,
    ) -> Result<Option<QueueTicket>, LockError> {
        tracing::info!(
            ticket_id = %ticket_id,
            attempts = self.options.attempts,
            interval = %humantime::format_duration(self.options.interval),
            budget = %humantime::format_duration(self.options.budget()),
            "waiting for lock"
        );
        self.emit(PollEvent::Started {
            ticket_id: ticket_id.clone(),
            attempts: self.options.attempts,
            interval: self.options.interval,
        });

        let started = self.clock.now();
        let mut state = PollState::Waiting { attempt: 0 };
        loop {
            state = match state {
                PollState::Waiting { attempt } if attempt >= self.options.attempts => {
                    PollState::TimedOut
                }
                PollState::Waiting { attempt } => self.observe(ticket_id, attempt)?,
                PollState::Recovering { attempt } => self.recover(attempt)?,
                PollState::Succeeded(ticket) => {
                    let waited = self.clock.now().saturating_duration_since(started);
                    tracing::info!(
                        ticket_id = %ticket_id,
                        waited = %humantime::format_duration(waited),
                        "lock acquired"
                    );
                    return Ok(Some(ticket));
                }
                PollState::FailedTerminal(ticket) => return self.terminated(ticket),
                PollState::TimedOut => return self.timed_out(ticket_id),
            };
        }
    }

    /// One attempt: ping, fetch, then classify the observed status
    fn observe(&mut self, ticket_id: &TicketId, attempt: u32) -> Result<PollState, LockError> {
        if self.cancel.is_cancelled() {
            return Err(LockError::Cancelled);
        }

        let fetched = ensure_reachable(self.broker)
            .and_then(|()| self.broker.fetch_ticket(ticket_id).map_err(LockError::from));
        let ticket = match fetched {
            Ok(ticket) => ticket,
            // A termination signal can land mid-call and surface as an I/O error
            Err(e) if self.cancel.is_cancelled() => {
                tracing::debug!(ticket_id = %ticket_id, attempt, error = %e, "call interrupted by cancellation");
                return Err(LockError::Cancelled);
            }
            Err(e) if e.is_connectivity() && self.options.resume_on_connection_error => {
                tracing::warn!(ticket_id = %ticket_id, attempt, error = %e, "broker unreachable, waiting for it to return");
                self.emit(PollEvent::ConnectionLost {
                    attempt,
                    error: e.to_string(),
                });
                return Ok(PollState::Recovering { attempt });
            }
            Err(e) => return Err(e),
        };

        let status = ticket.status;
        if status.is_unsuccessful() {
            return Ok(PollState::FailedTerminal(ticket));
        }
        if status.is_terminal() {
            return Ok(PollState::Succeeded(ticket));
        }

        tracing::debug!(ticket_id = %ticket_id, attempt, %status, "ticket still waiting");
        self.emit(PollEvent::StillWaiting { attempt, status });
        beat(self.broker, self.clock, ticket_id);
        if self.clock.sleep(self.options.interval, &self.cancel) {
            return Err(LockError::Cancelled);
        }
        Ok(PollState::Waiting {
            attempt: attempt.saturating_add(1),
        })
    }

    fn recover(&mut self, attempt: u32) -> Result<PollState, LockError> {
        let cycles =
            wait_until_reachable(self.broker, self.clock, self.options.interval, &self.cancel)?;
        self.emit(PollEvent::Reconnected { attempt, cycles });
        Ok(PollState::Waiting { attempt })
    }

    fn terminated(&mut self, ticket: QueueTicket) -> Result<Option<QueueTicket>, LockError> {
        tracing::warn!(
            ticket_id = %ticket.id,
            status = %ticket.status,
            description = ticket.description.as_deref().unwrap_or(""),
            "ticket terminated by broker"
        );
        if self.options.silent {
            return Ok(None);
        }
        Err(LockError::QueueTerminated {
            ticket: Box::new(ticket),
        })
    }

    fn timed_out(&mut self, ticket_id: &TicketId) -> Result<Option<QueueTicket>, LockError> {
        tracing::warn!(
            ticket_id = %ticket_id,
            attempts = self.options.attempts,
            "attempt budget exhausted"
        );
        let aborted =
            self.options.abort_on_timeout && try_abort(self.broker, ticket_id, TIMEOUT_REASON);
        self.emit(PollEvent::TimedOut { aborted });
        if self.options.silent {
            return Ok(None);
        }
        Err(LockError::AcquisitionTimeout {
            ticket_id: ticket_id.clone(),
            attempts: self.options.attempts,
            interval: self.options.interval,
        })
    }

    fn emit(&mut self, event: PollEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }
}

/// Poll `ticket_id` with the given options; no observer, no cancellation
pub fn await_completion<B: Broker, C: Clock>(
    broker: &B,
    clock: &C,
    ticket_id: &TicketId,
    options: PollOptions,
) -> Result<Option<QueueTicket>, LockError> {
    Poller::new(broker, clock, options).await_completion(ticket_id)
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
