//! `rlock lock` failure paths

use crate::prelude::*;

#[test]
fn exhausted_budget_aborts_ticket() {
    let broker = Broker::start();
    broker.enqueues("env-pool", 7);
    broker.ticket_status(7, "PENDING", None);
    broker.accepts_updates(7);

    Sandbox::new()
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5", "-a", "1"])
        .exits_with(5)
        .stderr_has("still pending after 1 attempts");

    let updates = broker.bodies("PUT", "/api/rqueue/7");
    let abort = updates.last().unwrap();
    assert_eq!(abort["status"], "ABORTED");
    assert!(abort["description"].is_string());
}

#[test]
fn broker_abort_is_queue_terminated() {
    let broker = Broker::start();
    broker.enqueues("env-pool", 7);
    broker.mount(
        Mock::given(method("GET"))
            .and(path("/api/rqueue/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "status": "ABORTED",
                "description": "resource retired",
            }))),
    );

    Sandbox::new()
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5"])
        .exits_with(6)
        .stderr_has("ticket 7 ended as ABORTED: resource retired");
}

#[test]
fn unknown_ticket_fails_without_retry() {
    let broker = Broker::start();
    broker.enqueues("env-pool", 7);
    broker.mount(
        Mock::given(method("GET"))
            .and(path("/api/rqueue/7"))
            .respond_with(ResponseTemplate::new(404)),
    );

    Sandbox::new()
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5"])
        .exits_with(1)
        .stderr_has("ticket not known to broker: 7");

    let fetches = broker
        .requests()
        .iter()
        .filter(|r| r.url.path() == "/api/rqueue/7")
        .count();
    assert_eq!(fetches, 1);
}

#[test]
fn rejected_submission_shows_broker_body() {
    let broker = Broker::start();
    broker.mount(
        Mock::given(method("PUT"))
            .and(path("/api/resource/retrieve/env-pool"))
            .respond_with(ResponseTemplate::new(400).set_body_string("{\"priority\":[\"invalid\"]}")),
    );
    let sandbox = Sandbox::new();

    sandbox
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5"])
        .exits_with(1)
        .stderr_has("broker returned status 400")
        .stderr_has("priority");

    assert!(!sandbox.file("queue_id.log").exists());
}

#[test]
fn malformed_ticket_is_application_error() {
    let broker = Broker::start();
    broker.enqueues("env-pool", 7);
    broker.mount(
        Mock::given(method("GET"))
            .and(path("/api/rqueue/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "status": "DONE" }))),
    );

    Sandbox::new()
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5"])
        .exits_with(1)
        .stderr_has("broker returned status 200");
}

#[test]
fn unreachable_broker_without_resume_is_connectivity_fault() {
    let broker = Broker::silent();
    let sandbox = Sandbox::new();

    sandbox
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5"])
        .exits_with(4)
        .stderr_has("--resume-on-connection-error");

    assert!(!sandbox.file("queue_id.log").exists());
}
