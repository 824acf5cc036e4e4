//! Usage and configuration error specs

use crate::prelude::*;

#[test]
fn missing_server_url_is_usage_error() {
    Sandbox::new()
        .rlock()
        .args(["-t", TOKEN, "check", "env-1"])
        .exits_with(2)
        .stderr_has("no broker URL configured")
        .stderr_has("--server-url");
}

#[test]
fn missing_token_is_usage_error() {
    Sandbox::new()
        .rlock()
        .args(["-s", "http://127.0.0.1:9", "check", "env-1"])
        .exits_with(2)
        .stderr_has("RLOCK_TOKEN");
}

#[test]
fn unknown_subcommand_is_usage_error() {
    Sandbox::new().rlock().arg("grab").exits_with(2);
}

#[test]
fn non_numeric_priority_is_usage_error() {
    Sandbox::new()
        .rlock()
        .args(["lock", "env-pool", "build-42", "high"])
        .exits_with(2);
}

#[test]
fn zero_attempts_rejected() {
    let broker = Broker::start();
    Sandbox::new()
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5", "-a", "0"])
        .exits_with(2)
        .stderr_has("attempts must be at least 1");
    assert!(broker.requests().is_empty());
}

#[test]
fn unsupported_url_scheme_is_usage_error() {
    Sandbox::new()
        .rlock()
        .args(["-s", "ftp://broker", "-t", TOKEN, "check", "env-1"])
        .exits_with(2)
        .stderr_has("invalid broker url");
}

#[test]
fn settings_come_from_environment() {
    let broker = Broker::start();
    broker.lists_nothing_else();

    Sandbox::new()
        .rlock()
        .env("RLOCK_SERVER_URL", broker.url())
        .env("RLOCK_TOKEN", TOKEN)
        .args(["check", "env-1"])
        .exits_with(3);
}

#[test]
fn settings_come_from_config_file() {
    let broker = Broker::start();
    broker.lists_nothing_else();
    let sandbox = Sandbox::new();
    let config = sandbox.write(
        "rlock.toml",
        &format!("server_url = \"{}\"\ntoken = \"{TOKEN}\"\n", broker.url()),
    );

    sandbox
        .rlock()
        .arg("--config")
        .arg(&config)
        .args(["check", "env-1"])
        .exits_with(3);

    let auth: Vec<_> = broker
        .requests()
        .iter()
        .filter(|r| r.url.path() == "/api/resources")
        .filter_map(|r| r.headers.get("authorization").map(|v| v.to_str().unwrap_or("").to_string()))
        .collect();
    assert_eq!(auth, vec![format!("Token {TOKEN}"); 2]);
}

#[test]
fn missing_explicit_config_is_an_error() {
    let sandbox = Sandbox::new();
    sandbox
        .rlock()
        .env("RLOCK_CONFIG", sandbox.file("absent.toml"))
        .args(["check", "env-1"])
        .exits_with(2)
        .stderr_has("cannot read config");
}

#[test]
fn unreachable_broker_exits_with_connectivity_code() {
    let broker = Broker::silent();
    Sandbox::new()
        .rlock_at(&broker)
        .args(["check", "env-1"])
        .exits_with(4)
        .stderr_has("broker unreachable")
        .stderr_has("--resume-on-connection-error");
}
