// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue tickets issued by the broker for asynchronous lock requests
//!
//! The broker owns ticket status. The client only observes it and asks for
//! transitions (abort, heartbeat); it never writes `FINISHED` or `FAILED`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque ticket identifier assigned by the broker.
///
/// The broker may send it as a JSON number or string; it is kept in string
/// form either way.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TicketId(pub String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TicketId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for TicketId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TicketId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(TicketId(n.to_string())),
            Raw::Text(s) if s.trim().is_empty() => {
                Err(serde::de::Error::custom("ticket id must not be empty"))
            }
            Raw::Text(s) => Ok(TicketId(s)),
        }
    }
}

/// Broker-side status of a queue ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketStatus {
    Initializing,
    Pending,
    Finished,
    Aborted,
    Failed,
}

impl TicketStatus {
    /// Terminal statuses must not be polled further
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TicketStatus::Finished | TicketStatus::Aborted | TicketStatus::Failed
        )
    }

    /// True for the two terminal statuses that mean the lock was not granted
    pub fn is_unsuccessful(&self) -> bool {
        matches!(self, TicketStatus::Aborted | TicketStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Initializing => "INITIALIZING",
            TicketStatus::Pending => "PENDING",
            TicketStatus::Finished => "FINISHED",
            TicketStatus::Aborted => "ABORTED",
            TicketStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a queue ticket as returned by the broker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueTicket {
    pub id: TicketId,
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_beat: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Broker-specific payload, e.g. the resource granted on completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl QueueTicket {
    pub fn new(id: impl Into<String>, status: TicketStatus) -> Self {
        Self {
            id: TicketId::new(id),
            status,
            description: None,
            last_beat: None,
            priority: None,
            data: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Mutation requested on a ticket (`PUT rqueue/{id}`)
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TicketUpdate {
    /// Explicit abort with a human-readable reason
    Abort {
        status: TicketStatus,
        description: String,
    },
    /// Generic status transition
    Status { status: TicketStatus },
    /// Liveness heartbeat
    Beat { last_beat: DateTime<Utc> },
}

impl TicketUpdate {
    pub fn abort(description: impl Into<String>) -> Self {
        TicketUpdate::Abort {
            status: TicketStatus::Aborted,
            description: description.into(),
        }
    }

    pub fn status(status: TicketStatus) -> Self {
        TicketUpdate::Status { status }
    }

    pub fn beat(at: DateTime<Utc>) -> Self {
        TicketUpdate::Beat { last_beat: at }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            TicketUpdate::Abort { .. } => "abort",
            TicketUpdate::Status { .. } => "status",
            TicketUpdate::Beat { .. } => "beat",
        }
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
