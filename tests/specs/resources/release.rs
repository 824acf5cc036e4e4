//! `rlock release` specs

use crate::prelude::*;

#[test]
fn release_unlocks_resource_held_by_signoff() {
    let broker = Broker::start();
    broker.lists(
        "signoff",
        "build-42",
        json!([{
            "name": "env-1",
            "labels": ["env-pool"],
            "is_locked": true,
            "signoff": "build-42",
            "link": "https%3A%2F%2Fci",
            "description": "shared staging",
        }]),
    );
    broker.stores_resource("env-1");

    Sandbox::new()
        .rlock_at(&broker)
        .args(["release", "build-42"])
        .passes()
        .stdout_has("Released env-1 successfully!");

    let puts = broker.bodies("PUT", "/api/resource/env-1");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0]["is_locked"], false);
    assert_eq!(puts[0]["description"], "shared staging");
}

#[test]
fn release_without_holder_is_a_no_op() {
    let broker = Broker::start();
    broker.lists_nothing_else();

    Sandbox::new()
        .rlock_at(&broker)
        .args(["release", "build-42"])
        .passes()
        .stdout_has("There is no resource locked under build-42, ignoring!");

    assert!(broker.bodies("PUT", "/api/resource/env-1").is_empty());
}
