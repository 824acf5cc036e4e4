// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rlock lock`: queue a lock request and wait for the broker to grant it

use super::connect;
use crate::config::Settings;
use crate::error::{exit_code, CliError};
use crate::output::{self, OutputFormat};
use clap::Args;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rlock_core::{CancelToken, LockRequest, QueueTicket};
use rlock_engine::{CancellationHandler, PollEvent, PollOptions, TicketRecord};
use std::process::ExitCode;

/// Everything but unreserved characters is escaped, slashes included
const LINK_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Args, Debug)]
pub struct LockArgs {
    /// Name or label of the resource to lock
    #[arg(value_name = "SEARCH")]
    pub search: String,

    /// Unique claim identifier, used later to release the resource
    #[arg(value_name = "SIGN_OFF")]
    pub signoff: String,

    /// Queue priority of the request
    #[arg(value_name = "PRIORITY", allow_negative_numbers = true)]
    pub priority: i64,

    /// How many times to check the ticket before giving up [default: 120]
    #[arg(short, long)]
    pub attempts: Option<u32>,

    /// Link of the CI/CD pipeline requesting the lock
    #[arg(short, long)]
    pub link: Option<String>,
}

/// Percent-encode a pipeline link for the request body
pub fn encode_link(link: &str) -> String {
    utf8_percent_encode(link, LINK_ESCAPE).to_string()
}

pub fn handle(
    args: LockArgs,
    settings: &Settings,
    cancel: &CancelToken,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let client = match connect(settings, cancel) {
        Err(_) if cancel.is_cancelled() => return Ok(cancelled(None)),
        other => other?,
    };

    let mut request = LockRequest::new(args.search, args.signoff, args.priority);
    if let Some(link) = args.link.as_deref() {
        request = request.with_link(encode_link(link));
    }

    if cancel.is_cancelled() {
        return Ok(cancelled(None));
    }
    // Submitted exactly once; a retry could orphan a ticket the broker
    // already registered.
    let ticket_id = match client.submit(&request, Some(settings.request_timeout)) {
        Err(_) if cancel.is_cancelled() => return Ok(cancelled(None)),
        other => other?,
    };
    TicketRecord::new(&settings.ticket_file).write(&ticket_id)?;
    if format.is_text() {
        eprintln!("Lock request queued as ticket {ticket_id}");
    }

    let handler = CancellationHandler::new(client.broker().clone(), cancel.clone());
    handler.arm(ticket_id.clone());

    let options = PollOptions::new(settings.interval, settings.attempts)
        .abort_on_timeout(true)
        .resume_on_connection_error(settings.resume_on_connection_error);
    let outcome = client
        .poller(options)
        .with_cancel(cancel.clone())
        .with_observer(|event| {
            if format.is_text() {
                report(event, settings);
            }
        })
        .await_completion(&ticket_id);

    match outcome {
        Ok(Some(ticket)) => {
            handler.disarm();
            print_locked(&ticket, format);
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => {
            handler.disarm();
            Err(CliError::new(format!(
                "could not confirm that ticket {ticket_id} was granted"
            )))
        }
        // Covers calls interrupted by the signal as well as the poll loop
        // noticing it
        Err(_) if cancel.is_cancelled() => {
            let aborted = handler.cancel_outstanding();
            Ok(cancelled(aborted.map(|id| id.to_string())))
        }
        Err(err) => {
            handler.disarm();
            Err(err.into())
        }
    }
}

fn cancelled(ticket: Option<String>) -> ExitCode {
    match ticket {
        Some(id) => eprintln!("Cancelled; abort requested for ticket {id}"),
        None => eprintln!("Cancelled before a ticket was assigned"),
    }
    ExitCode::from(exit_code::SUCCESS)
}

fn report(event: &PollEvent, settings: &Settings) {
    let every = humantime::format_duration(settings.interval);
    match event {
        PollEvent::Started {
            ticket_id,
            attempts,
            interval,
        } => eprintln!(
            "Waiting up to {} for ticket {ticket_id} ({attempts} checks, every {every})",
            humantime::format_duration(rlock_engine::budget(*interval, *attempts)),
        ),
        PollEvent::StillWaiting { attempt, status } => eprintln!(
            "Ticket is {status} (check {}/{}), next check in {every}",
            attempt + 1,
            settings.attempts
        ),
        PollEvent::ConnectionLost { error, .. } => {
            eprintln!("Lost connection to the broker: {error}; retrying every {every}")
        }
        PollEvent::Reconnected { cycles, .. } => {
            eprintln!("Broker reachable again after {cycles} retries; resuming")
        }
        PollEvent::TimedOut { aborted: true } => {
            eprintln!("Gave up waiting; the ticket has been aborted")
        }
        PollEvent::TimedOut { aborted: false } => eprintln!("Gave up waiting"),
    }
}

fn print_locked(ticket: &QueueTicket, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("Resource locked successfully! Info:");
            output::print_json(ticket);
        }
        OutputFormat::Json => output::print_json(ticket),
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
