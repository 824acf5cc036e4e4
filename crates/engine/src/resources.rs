// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Direct resource queries and mutations
//!
//! Single-call operations around `GET resources` and `PUT resource/{name}`.

use crate::LockError;
use rlock_adapters::Broker;
use rlock_core::{LockableResource, ResourceFilter};

/// Resources matching a search string, by name and by label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckResult {
    pub by_name: Vec<LockableResource>,
    pub by_label: Vec<LockableResource>,
}

impl CheckResult {
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_label.is_empty()
    }
}

pub fn list_resources<B: Broker>(
    broker: &B,
    filter: &ResourceFilter,
) -> Result<Vec<LockableResource>, LockError> {
    let resources = broker.list_resources(filter)?;
    tracing::debug!(count = resources.len(), ?filter, "resources listed");
    Ok(resources)
}

/// Look `search` up as a resource name and as a label pattern
pub fn check<B: Broker>(broker: &B, search: &str) -> Result<CheckResult, LockError> {
    Ok(CheckResult {
        by_name: list_resources(broker, &ResourceFilter::by_name(search))?,
        by_label: list_resources(broker, &ResourceFilter::by_label(search))?,
    })
}

/// Free the first resource held under `signoff`.
///
/// Returns the released resource as stored by the broker, or `None` when
/// nothing is held under that signoff.
pub fn release_by_signoff<B: Broker>(
    broker: &B,
    signoff: &str,
) -> Result<Option<LockableResource>, LockError> {
    let held = list_resources(broker, &ResourceFilter::by_signoff(signoff))?;
    let Some(resource) = held.into_iter().next() else {
        tracing::info!(signoff, "no resource held under signoff");
        return Ok(None);
    };
    let released = unlock_resource(broker, &resource)?;
    Ok(Some(released))
}

/// Mark `resource` locked under `signoff` directly, bypassing the queue
pub fn lock_resource<B: Broker>(
    broker: &B,
    resource: &LockableResource,
    signoff: &str,
    link: Option<String>,
) -> Result<LockableResource, LockError> {
    let stored = broker.put_resource(&resource.locked_by(signoff, link))?;
    tracing::info!(resource = %stored.name, signoff, "resource locked");
    Ok(stored)
}

/// Mark `resource` free; the signoff is left for the broker to clear
pub fn unlock_resource<B: Broker>(
    broker: &B,
    resource: &LockableResource,
) -> Result<LockableResource, LockError> {
    let stored = broker.put_resource(&resource.released())?;
    tracing::info!(resource = %stored.name, "resource released");
    Ok(stored)
}

/// Fetch a resource by exact name
pub fn find_resource<B: Broker>(broker: &B, name: &str) -> Result<LockableResource, LockError> {
    list_resources(broker, &ResourceFilter::by_name(name))?
        .into_iter()
        .find(|r| r.name == name)
        .ok_or_else(|| LockError::NoSuchResource(name.to_string()))
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod tests;
