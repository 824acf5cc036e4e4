//! `rlock lock` happy paths

use crate::prelude::*;

#[test]
fn lock_prints_granted_ticket() {
    let broker = Broker::start();
    broker.enqueues("env-pool", 7);
    broker.ticket_status(7, "FINISHED", None);

    Sandbox::new()
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5"])
        .passes()
        .stdout_has("Resource locked successfully!")
        .stdout_has("\"resource\": \"env-1\"")
        .stderr_has("Lock request queued as ticket 7");
}

#[test]
fn lock_sends_request_body_with_token() {
    let broker = Broker::start();
    broker.enqueues("env-pool", 7);
    broker.ticket_status(7, "FINISHED", None);

    Sandbox::new()
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5"])
        .args(["-l", "https://ci.example/job/42"])
        .passes();

    let bodies = broker.bodies("PUT", "/api/resource/retrieve/env-pool");
    similar_asserts::assert_eq!(
        bodies,
        vec![json!({
            "signoff": "build-42",
            "priority": 5,
            "link": "https%3A%2F%2Fci.example%2Fjob%2F42",
        })]
    );
    let submit = broker
        .requests()
        .into_iter()
        .find(|r| r.url.path() == "/api/resource/retrieve/env-pool")
        .unwrap();
    assert_eq!(
        submit.headers.get("authorization").unwrap().to_str().unwrap(),
        format!("Token {TOKEN}")
    );
}

#[test]
fn lock_records_ticket_id_without_newline() {
    let broker = Broker::start();
    broker.enqueues("env-pool", 1234);
    broker.ticket_status(1234, "FINISHED", None);
    let sandbox = Sandbox::new();

    sandbox
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5"])
        .passes();

    assert_eq!(sandbox.read("queue_id.log"), "1234");
}

#[test]
fn ticket_file_location_is_configurable() {
    let broker = Broker::start();
    broker.enqueues("env-pool", 9);
    broker.ticket_status(9, "FINISHED", None);
    let sandbox = Sandbox::new();

    sandbox
        .rlock_at(&broker)
        .args(["--ticket-file", "ticket.txt", "lock", "env-pool", "build-42", "5"])
        .passes();

    assert_eq!(sandbox.read("ticket.txt"), "9");
}

#[test]
fn pending_ticket_is_heartbeated_until_finished() {
    let broker = Broker::start();
    broker.enqueues("env-pool", 7);
    broker.ticket_status(7, "PENDING", Some(1));
    broker.ticket_status(7, "FINISHED", None);
    broker.accepts_updates(7);

    Sandbox::new()
        .rlock_at(&broker)
        .args(["lock", "env-pool", "build-42", "5", "-a", "3"])
        .passes()
        .stderr_has("Ticket is PENDING (check 1/3)");

    let beats = broker.bodies("PUT", "/api/rqueue/7");
    assert_eq!(beats.len(), 1);
    assert!(beats[0]["last_beat"].is_string());
}

#[test]
fn json_format_prints_only_ticket() {
    let broker = Broker::start();
    broker.enqueues("env-pool", 7);
    broker.ticket_status(7, "FINISHED", None);

    let assert = Sandbox::new()
        .rlock_at(&broker)
        .args(["--format", "json", "lock", "env-pool", "build-42", "5"])
        .passes();

    let ticket = stdout_json(&assert);
    assert_eq!(ticket["status"], "FINISHED");
    assert_eq!(ticket["id"], "7");
}
