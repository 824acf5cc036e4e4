// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local record of the last submitted ticket
//!
//! Written right after submission so a supervisor can find and abort the
//! ticket if the client dies before its cancellation handler is armed.

use crate::LockError;
use rlock_core::TicketId;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default file name, relative to the working directory
pub const DEFAULT_TICKET_FILE: &str = "queue_id.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    path: PathBuf,
}

impl TicketRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the record with `ticket_id` (no trailing newline)
    pub fn write(&self, ticket_id: &TicketId) -> Result<(), LockError> {
        std::fs::write(&self.path, ticket_id.as_str())?;
        tracing::debug!(ticket_id = %ticket_id, path = %self.path.display(), "ticket recorded");
        Ok(())
    }

    /// Read the recorded ticket; `None` when no record exists or it is blank
    pub fn read(&self) -> Result<Option<TicketId>, LockError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let id = contents.trim();
        if id.is_empty() {
            return Ok(None);
        }
        Ok(Some(TicketId::new(id)))
    }
}

impl Default for TicketRecord {
    fn default() -> Self {
        Self::new(DEFAULT_TICKET_FILE)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
