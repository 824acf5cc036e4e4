//! Shared helpers for CLI specs
//!
//! `Broker` is a wiremock server standing in for the resource locker;
//! `Sandbox` is a scratch working directory with an isolated environment.

#![allow(dead_code)]

pub use assert_cmd::assert::Assert;
pub use assert_cmd::Command;
pub use predicates::prelude::*;
pub use serde_json::{json, Value};
pub use std::path::{Path, PathBuf};
pub use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
pub use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use tempfile::TempDir;
use tokio::runtime::Runtime;

pub const TOKEN: &str = "secret-token";

/// A wiremock broker that answers its liveness check
pub struct Broker {
    server: MockServer,
    rt: Runtime,
}

impl Broker {
    pub fn start() -> Self {
        let broker = Self::silent();
        broker.mount(Mock::given(method("GET")).and(path("/")).respond_with(ResponseTemplate::new(200)));
        broker
    }

    /// A broker without any routes, not even the liveness check
    pub fn silent() -> Self {
        let rt = Runtime::new().expect("tokio runtime");
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    /// Queue a lock request under `search`, assigning ticket `id`
    pub fn enqueues(&self, search: &str, id: u64) {
        self.mount(
            Mock::given(method("PUT"))
                .and(path(format!("/api/resource/retrieve/{search}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": id }))),
        );
    }

    /// Report `status` for ticket `id`, `times` times (forever if `None`)
    pub fn ticket_status(&self, id: u64, status: &str, times: Option<u64>) {
        let mock = Mock::given(method("GET"))
            .and(path(format!("/api/rqueue/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "status": status,
                "description": null,
                "data": { "resource": "env-1" },
            })));
        let mock = match times {
            Some(n) => mock.up_to_n_times(n).with_priority(1),
            None => mock,
        };
        self.mount(mock);
    }

    /// Accept every ticket update for `id`
    pub fn accepts_updates(&self, id: u64) {
        self.mount(
            Mock::given(method("PUT"))
                .and(path(format!("/api/rqueue/{id}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({}))),
        );
    }

    /// Answer resource listings whose query contains `key=value`
    pub fn lists(&self, key: &str, value: &str, resources: Value) {
        self.mount(
            Mock::given(method("GET"))
                .and(path("/api/resources"))
                .and(query_param(key, value))
                .respond_with(ResponseTemplate::new(200).set_body_json(resources)),
        );
    }

    /// Any listing not matched otherwise is empty
    pub fn lists_nothing_else(&self) {
        self.mount(
            Mock::given(method("GET"))
                .and(path("/api/resources"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([]))),
        );
    }

    /// Echo back resources PUT to `/api/resource/{name}`
    pub fn stores_resource(&self, name: &str) {
        self.mount(
            Mock::given(method("PUT"))
                .and(path(format!("/api/resource/{name}")))
                .respond_with(|req: &Request| {
                    let body: Value = serde_json::from_slice(&req.body).unwrap_or(Value::Null);
                    ResponseTemplate::new(200).set_body_json(body)
                }),
        );
    }

    pub fn requests(&self) -> Vec<Request> {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    /// Bodies of requests with this method and path, in arrival order
    pub fn bodies(&self, verb: &str, route: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == route)
            .map(|r| serde_json::from_slice(&r.body).unwrap_or(Value::Null))
            .collect()
    }
}

/// Scratch directory the CLI runs in, isolated from the user's config
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.file(name);
        std::fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.file(name)).expect("read file")
    }

    /// `rlock` with no broker settings
    pub fn rlock(&self) -> Command {
        let mut cmd = Command::cargo_bin("rlock").expect("rlock binary");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("RLOCK_LOG");
        for var in [
            "RLOCK_SERVER_URL",
            "RLOCK_TOKEN",
            "RLOCK_INTERVAL",
            "RLOCK_ATTEMPTS",
            "RLOCK_RESUME_ON_CONNECTION_ERROR",
            "RLOCK_REQUEST_TIMEOUT",
            "RLOCK_TICKET_FILE",
            "RLOCK_CONFIG",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// `rlock` pointed at `broker` with a one-second interval
    pub fn rlock_at(&self, broker: &Broker) -> Command {
        let mut cmd = self.rlock();
        cmd.args(["-s", &broker.url(), "-t", TOKEN, "-i", "1"]);
        cmd
    }
}

pub trait CommandExt {
    fn passes(&mut self) -> Assert;
    fn exits_with(&mut self, code: i32) -> Assert;
}

impl CommandExt for Command {
    fn passes(&mut self) -> Assert {
        self.assert().success()
    }

    fn exits_with(&mut self, code: i32) -> Assert {
        self.assert().code(code)
    }
}

pub trait AssertExt {
    fn stdout_has(self, text: &str) -> Self;
    fn stderr_has(self, text: &str) -> Self;
    fn stdout_lacks(self, text: &str) -> Self;
}

impl AssertExt for Assert {
    fn stdout_has(self, text: &str) -> Self {
        self.stdout(predicate::str::contains(text))
    }

    fn stderr_has(self, text: &str) -> Self {
        self.stderr(predicate::str::contains(text))
    }

    fn stdout_lacks(self, text: &str) -> Self {
        self.stdout(predicate::str::contains(text).not())
    }
}

/// Parse the stdout of a finished command as JSON
pub fn stdout_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("stdout is JSON")
}
