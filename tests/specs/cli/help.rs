//! Help and completions specs

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    Sandbox::new()
        .rlock()
        .arg("--help")
        .passes()
        .stdout_has("lock")
        .stdout_has("release")
        .stdout_has("check")
        .stdout_has("abort-recorded");
}

#[test]
fn lock_help_shows_positionals_and_options() {
    Sandbox::new()
        .rlock()
        .args(["lock", "--help"])
        .passes()
        .stdout_has("SEARCH")
        .stdout_has("SIGN_OFF")
        .stdout_has("PRIORITY")
        .stdout_has("--attempts")
        .stdout_has("--link");
}

#[test]
fn completions_need_no_broker() {
    Sandbox::new()
        .rlock()
        .args(["completions", "bash"])
        .passes()
        .stdout_has("rlock");
}

#[test]
fn version_is_printed() {
    Sandbox::new()
        .rlock()
        .arg("--version")
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}
