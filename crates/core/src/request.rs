// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock requests submitted to the broker queue

use serde::Serialize;

/// A request to lock one resource matching `search_key`.
///
/// Only the priority, signoff and link travel in the body; the search key is
/// part of the endpoint path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LockRequest {
    /// Resource name or label pattern
    #[serde(skip)]
    pub search_key: String,
    /// Caller-chosen claim identifier, later used for release
    pub signoff: String,
    pub priority: i64,
    /// URL-encoded link to the pipeline requesting the lock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl LockRequest {
    pub fn new(search_key: impl Into<String>, signoff: impl Into<String>, priority: i64) -> Self {
        Self {
            search_key: search_key.into(),
            signoff: signoff.into(),
            priority,
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}
