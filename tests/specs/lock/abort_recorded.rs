//! `rlock abort-recorded` specs

use crate::prelude::*;

#[test]
fn aborts_recorded_ticket_with_default_reason() {
    let broker = Broker::start();
    broker.accepts_updates(55);
    let sandbox = Sandbox::new();
    sandbox.write("queue_id.log", "55");

    sandbox
        .rlock_at(&broker)
        .arg("abort-recorded")
        .passes()
        .stdout_has("Aborted ticket 55");

    let updates = broker.bodies("PUT", "/api/rqueue/55");
    assert_eq!(
        updates,
        vec![json!({
            "status": "ABORTED",
            "description": "Queue has been aborted in the middle of a CI/CD Pipeline or during manual execution.",
        })]
    );
}

#[test]
fn custom_reason_is_sent() {
    let broker = Broker::start();
    broker.accepts_updates(55);
    let sandbox = Sandbox::new();
    sandbox.write("queue_id.log", "55");

    sandbox
        .rlock_at(&broker)
        .args(["abort-recorded", "--reason", "pipeline cancelled"])
        .passes();

    let updates = broker.bodies("PUT", "/api/rqueue/55");
    assert_eq!(updates[0]["description"], "pipeline cancelled");
}

#[test]
fn nothing_recorded_fails() {
    let broker = Broker::start();

    Sandbox::new()
        .rlock_at(&broker)
        .arg("abort-recorded")
        .exits_with(1)
        .stderr_has("no ticket recorded in queue_id.log");

    assert!(broker.requests().is_empty());
}
