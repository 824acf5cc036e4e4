// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking HTTP broker over `ureq`
//!
//! Endpoints live under `<server>/api`; the liveness check hits the
//! instance root. Every call carries `Authorization: Token <token>`.

use super::{Broker, BrokerError};
use rlock_core::{
    LockRequest, LockableResource, QueueTicket, ResourceFilter, TicketId, TicketUpdate,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ureq::http::Response;
use ureq::{Agent, Body};
use url::Url;

/// HTTP implementation of [`Broker`]
#[derive(Clone)]
pub struct HttpBroker {
    agent: Agent,
    root: Url,
    auth: String,
}

/// Status and body of a completed exchange
struct Reply {
    status: u16,
    body: String,
}

impl Reply {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn into_status_error(self) -> BrokerError {
        BrokerError::Status {
            status: self.status,
            body: self.body,
        }
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T, BrokerError> {
        serde_json::from_str(&self.body).map_err(|e| BrokerError::Decode {
            status: self.status,
            message: e.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct Enqueued {
    id: TicketId,
}

/// The resource listing may come back bare or paginated
#[derive(Deserialize)]
#[serde(untagged)]
enum ResourceListing {
    Bare(Vec<LockableResource>),
    Page { results: Vec<LockableResource> },
}

impl HttpBroker {
    /// Build a client for the broker at `server_url`.
    ///
    /// `request_timeout` bounds every call unless a call overrides it.
    pub fn new(
        server_url: &str,
        token: &str,
        request_timeout: Duration,
    ) -> Result<Self, BrokerError> {
        let root =
            Url::parse(server_url).map_err(|e| BrokerError::InvalidUrl(format!("{server_url}: {e}")))?;
        if root.cannot_be_a_base() || !matches!(root.scheme(), "http" | "https") {
            return Err(BrokerError::InvalidUrl(server_url.to_string()));
        }

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(request_timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            root,
            auth: format!("Token {token}"),
        })
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// `<root>/api/<segments...>` with each segment percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    fn get(&self, url: &Url) -> Result<Reply, BrokerError> {
        tracing::trace!(%url, "GET");
        read_reply(
            self.agent
                .get(url.as_str())
                .header("Authorization", self.auth.as_str())
                .call(),
        )
    }

    fn put<T: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &T,
        timeout: Option<Duration>,
    ) -> Result<Reply, BrokerError> {
        tracing::trace!(%url, "PUT");
        let request = self
            .agent
            .put(url.as_str())
            .header("Authorization", self.auth.as_str());
        let request = match timeout {
            Some(timeout) => request.config().timeout_global(Some(timeout)).build(),
            None => request,
        };
        read_reply(request.send_json(body))
    }
}

impl Broker for HttpBroker {
    fn ping(&self) -> Result<(), BrokerError> {
        let reply = read_reply(self.agent.get(self.root.as_str()).call())?;
        if reply.status == 200 {
            Ok(())
        } else {
            Err(BrokerError::Unreachable(format!(
                "liveness check returned status {}",
                reply.status
            )))
        }
    }

    fn submit(
        &self,
        request: &LockRequest,
        timeout: Option<Duration>,
    ) -> Result<TicketId, BrokerError> {
        let url = self.endpoint(&["resource", "retrieve", &request.search_key]);
        let reply = self.put(&url, request, timeout)?;
        if !reply.is_success() {
            return Err(reply.into_status_error());
        }
        Ok(reply.decode::<Enqueued>()?.id)
    }

    fn fetch_ticket(&self, id: &TicketId) -> Result<QueueTicket, BrokerError> {
        let reply = self.get(&self.endpoint(&["rqueue", id.as_str()]))?;
        if reply.status == 404 {
            return Err(BrokerError::TicketNotFound(id.clone()));
        }
        if !reply.is_success() {
            return Err(reply.into_status_error());
        }
        reply.decode()
    }

    fn update_ticket(&self, id: &TicketId, update: &TicketUpdate) -> Result<(), BrokerError> {
        let reply = self.put(&self.endpoint(&["rqueue", id.as_str()]), update, None)?;
        if reply.status == 404 {
            return Err(BrokerError::TicketNotFound(id.clone()));
        }
        if !reply.is_success() {
            return Err(reply.into_status_error());
        }
        Ok(())
    }

    fn list_resources(
        &self,
        filter: &ResourceFilter,
    ) -> Result<Vec<LockableResource>, BrokerError> {
        let mut url = self.endpoint(&["resources"]);
        let pairs = filter.query_pairs();
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
        }

        let reply = self.get(&url)?;
        if !reply.is_success() {
            return Err(reply.into_status_error());
        }
        Ok(match reply.decode::<ResourceListing>()? {
            ResourceListing::Bare(resources) => resources,
            ResourceListing::Page { results } => results,
        })
    }

    fn put_resource(&self, resource: &LockableResource) -> Result<LockableResource, BrokerError> {
        let url = self.endpoint(&["resource", &resource.name]);
        let reply = self.put(&url, resource, None)?;
        if !reply.is_success() {
            return Err(reply.into_status_error());
        }
        reply.decode()
    }
}

fn read_reply(result: Result<Response<Body>, ureq::Error>) -> Result<Reply, BrokerError> {
    let mut response = result.map_err(transport_error)?;
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(transport_error)?;
    Ok(Reply { status, body })
}

fn transport_error(err: ureq::Error) -> BrokerError {
    match err {
        ureq::Error::Timeout(_) => BrokerError::Timeout,
        other => BrokerError::Unreachable(other.to_string()),
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
