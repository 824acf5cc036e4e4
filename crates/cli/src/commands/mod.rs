// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod abort_recorded;
pub mod check;
pub mod lock;
pub mod release;

use crate::config::Settings;
use crate::error::CliError;
use rlock_adapters::{HttpBroker, TracedBroker};
use rlock_core::{CancelToken, SystemClock};
use rlock_engine::{LockError, LockerClient};

pub type Broker = TracedBroker<HttpBroker>;
pub type Client = LockerClient<Broker, SystemClock>;

/// Build the broker client and check it answers.
///
/// With resume enabled an unreachable broker is waited out, which is safe
/// because no ticket exists yet.
pub fn connect(settings: &Settings, cancel: &CancelToken) -> Result<Client, CliError> {
    let http = HttpBroker::new(
        &settings.server_url,
        &settings.token,
        settings.request_timeout,
    )
    .map_err(LockError::from)?;
    let broker = TracedBroker::new(http);

    let client = if settings.resume_on_connection_error {
        LockerClient::connect_waiting(broker, SystemClock, settings.interval, cancel)
    } else {
        LockerClient::connect(broker, SystemClock)
    };
    unless_cancelled(client, cancel)
}

/// A failure after a termination signal is reported as the cancellation.
///
/// Signals interrupt in-flight calls, which then fail as connectivity
/// faults.
pub fn unless_cancelled<T>(
    result: Result<T, LockError>,
    cancel: &CancelToken,
) -> Result<T, CliError> {
    result.map_err(|err| match err {
        _ if cancel.is_cancelled() => LockError::Cancelled.into(),
        err => err.into(),
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
