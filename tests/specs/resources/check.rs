//! `rlock check` specs

use crate::prelude::*;

#[test]
fn check_lists_matches_by_name_and_label() {
    let broker = Broker::start();
    broker.lists(
        "label_matches",
        "env-pool",
        json!([
            { "name": "env-1", "labels": ["env-pool"], "is_locked": false },
            { "name": "env-2", "labels": ["env-pool"], "is_locked": true, "signoff": "build-7" },
        ]),
    );
    broker.lists_nothing_else();

    Sandbox::new()
        .rlock_at(&broker)
        .args(["check", "env-pool"])
        .passes()
        .stdout_has("Resources are available:")
        .stdout_has("env-1")
        .stdout_has("build-7");
}

#[test]
fn check_without_match_exits_3() {
    let broker = Broker::start();
    broker.lists_nothing_else();

    Sandbox::new()
        .rlock_at(&broker)
        .args(["check", "nothing"])
        .exits_with(3)
        .stdout_has("No resource available.");
}

#[test]
fn check_accepts_paginated_listing() {
    let broker = Broker::start();
    broker.lists(
        "name",
        "db-1",
        json!({ "count": 1, "results": [{ "name": "db-1", "is_locked": false }] }),
    );
    broker.lists_nothing_else();

    let assert = Sandbox::new()
        .rlock_at(&broker)
        .args(["--format", "json", "check", "db-1"])
        .passes();

    let report = stdout_json(&assert);
    assert_eq!(report["by_name"][0]["name"], "db-1");
    assert_eq!(report["by_label"], json!([]));
}
