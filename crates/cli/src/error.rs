// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Every error carries what went wrong, why it might have happened, how to
//! fix it, and the process exit code it maps to.

use rlock_engine::LockError;
use std::fmt;
use std::process::ExitCode;

/// Process exit statuses
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const NO_RESOURCE: u8 = 3;
    pub const CONNECTIVITY: u8 = 4;
    pub const ACQUISITION_TIMEOUT: u8 = 5;
    pub const QUEUE_TERMINATED: u8 = 6;
}

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    pub code: u8,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            code: exit_code::FAILURE,
        }
    }

    /// Invalid invocation or settings
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message).with_code(exit_code::USAGE)
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_code(mut self, code: u8) -> Self {
        self.code = code;
        self
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code)
    }

    /// No ticket id found in the record file
    pub fn nothing_recorded(path: &std::path::Path) -> Self {
        CliError::new(format!("no ticket recorded in {}", path.display()))
            .with_context("the record is written right after a lock request is queued")
            .with_suggestion("pass the file used by `rlock lock` with --ticket-file")
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}

impl From<LockError> for CliError {
    fn from(err: LockError) -> Self {
        let message = err.to_string();
        match err {
            LockError::Connectivity(_) => CliError::new(message)
                .with_code(exit_code::CONNECTIVITY)
                .with_context("the broker did not respond to a request")
                .with_suggestion("check --server-url and that the broker is running")
                .with_suggestion(
                    "re-run with --resume-on-connection-error to wait out broker outages",
                ),
            LockError::LockTimeout(_) => CliError::new(message)
                .with_code(exit_code::CONNECTIVITY)
                .with_context("a ticket may still have been queued by the broker")
                .with_suggestion("inspect the broker queue before submitting again")
                .with_suggestion("raise --request-timeout"),
            LockError::AcquisitionTimeout { .. } => CliError::new(message)
                .with_code(exit_code::ACQUISITION_TIMEOUT)
                .with_context("the requested resources stayed busy for the whole budget")
                .with_suggestion("raise --attempts or --interval to wait longer"),
            LockError::QueueTerminated { .. } => CliError::new(message)
                .with_code(exit_code::QUEUE_TERMINATED)
                .with_context("the broker aborted or failed the ticket"),
            LockError::InvalidTicket(_) => CliError::new(message)
                .with_context("the ticket id is wrong or the broker lost its queue state"),
            LockError::BrokerApplication { .. } => CliError::new(message),
            LockError::NoSuchResource(_) => CliError::new(message).with_code(exit_code::NO_RESOURCE),
            LockError::InvalidRequest(_) | LockError::InvalidUrl(_) => CliError::usage(message),
            LockError::Cancelled => CliError::new(message).with_code(exit_code::SUCCESS),
            LockError::Io(_) => CliError::new(message)
                .with_suggestion("choose a writable location with --ticket-file"),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
