// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rlock lock-acquisition protocol
//!
//! Submits lock requests, polls the resulting queue ticket to completion
//! under an attempt budget, heartbeats while waiting and aborts the ticket
//! when the client is stopped.

pub mod cancel;
mod client;
mod error;
pub mod guard;
pub mod heartbeat;
pub mod poller;
mod record;
pub mod resources;
pub mod submit;

pub use cancel::{CancellationHandler, CANCEL_REASON};
pub use client::LockerClient;
pub use error::{budget, LockError};
pub use poller::{await_completion, PollEvent, PollOptions, PollState, Poller, TIMEOUT_REASON};
pub use record::{TicketRecord, DEFAULT_TICKET_FILE};
pub use resources::CheckResult;
