// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lockable resources as reported by the broker

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A broker-owned resource. Never cached beyond a single call.
///
/// Fields the client does not model are kept in `extra` so a PUT sends the
/// resource back intact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LockableResource {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub signoff: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LockableResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeSet::new(),
            is_locked: false,
            signoff: None,
            link: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    /// Copy of this resource marked as locked under `signoff`
    pub fn locked_by(&self, signoff: impl Into<String>, link: Option<String>) -> Self {
        let mut resource = self.clone();
        resource.is_locked = true;
        resource.signoff = Some(signoff.into());
        if link.is_some() {
            resource.link = link;
        }
        resource
    }

    /// Copy of this resource marked as free
    pub fn released(&self) -> Self {
        let mut resource = self.clone();
        resource.is_locked = false;
        resource
    }
}

impl fmt::Display for LockableResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        write!(
            f,
            "{:<24} {:<8} {:<20} {}",
            self.name,
            if self.is_locked { "locked" } else { "free" },
            self.signoff.as_deref().unwrap_or("-"),
            labels.join(",")
        )
    }
}

/// Query filter for `GET resources`. Unset fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceFilter {
    pub name: Option<String>,
    pub label_matches: Option<String>,
    pub signoff: Option<String>,
    pub is_locked: Option<bool>,
}

impl ResourceFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_label(pattern: impl Into<String>) -> Self {
        Self {
            label_matches: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn by_signoff(signoff: impl Into<String>) -> Self {
        Self {
            signoff: Some(signoff.into()),
            ..Self::default()
        }
    }

    /// Query parameters in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(pattern) = &self.label_matches {
            pairs.push(("label_matches", pattern.clone()));
        }
        if let Some(signoff) = &self.signoff {
            pairs.push(("signoff", signoff.clone()));
        }
        if let Some(locked) = self.is_locked {
            pairs.push(("is_locked", locked.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
