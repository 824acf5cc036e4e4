// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SIGINT/SIGTERM wiring

use crate::error::exit_code;
use rlock_core::CancelToken;

/// Cancel `token` on the first interrupt or terminate signal; exit at once
/// on the second.
///
/// Whether a ticket gets aborted is up to the command observing the token.
pub fn install(token: CancelToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if token.cancel() {
            eprintln!("\nStopping...");
        } else {
            std::process::exit(i32::from(exit_code::SUCCESS));
        }
    })
}
