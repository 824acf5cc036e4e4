// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rlock-core: shared model for the rlock resource locker client
//!
//! This crate provides:
//! - Wire records exchanged with the broker (requests, tickets, resources)
//! - A clock abstraction so polling can be driven without real sleeps
//! - A cooperative cancellation token observed by every wait

pub mod cancel;
pub mod clock;
pub mod request;
pub mod resource;
pub mod ticket;

// Re-exports
pub use cancel::CancelToken;
pub use clock::{Clock, FakeClock, SystemClock};
pub use request::LockRequest;
pub use resource::{LockableResource, ResourceFilter};
pub use ticket::{QueueTicket, TicketId, TicketStatus, TicketUpdate};
