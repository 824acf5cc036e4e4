// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rlock check`: show resources matching a name or label

use super::{connect, unless_cancelled};
use crate::config::Settings;
use crate::error::{exit_code, CliError};
use crate::output::{self, OutputFormat};
use clap::Args;
use rlock_core::{CancelToken, LockableResource};
use rlock_engine::CheckResult;
use serde::Serialize;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Name or label to look up
    #[arg(value_name = "SEARCH")]
    pub search: String,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    by_name: &'a [LockableResource],
    by_label: &'a [LockableResource],
}

pub fn handle(
    args: CheckArgs,
    settings: &Settings,
    cancel: &CancelToken,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let client = connect(settings, cancel)?;
    let result = unless_cancelled(client.check(&args.search), cancel)?;

    if result.is_empty() {
        match format {
            OutputFormat::Text => println!("No resource available."),
            OutputFormat::Json => output::print_json(&report(&result)),
        }
        return Ok(ExitCode::from(exit_code::NO_RESOURCE));
    }

    match format {
        OutputFormat::Text => {
            println!("Resources are available:");
            println!("by name:");
            output::print_list(&result.by_name, format);
            println!("by label:");
            output::print_list(&result.by_label, format);
        }
        OutputFormat::Json => output::print_json(&report(&result)),
    }
    Ok(ExitCode::SUCCESS)
}

fn report(result: &CheckResult) -> CheckReport<'_> {
    CheckReport {
        by_name: &result.by_name,
        by_label: &result.by_label,
    }
}
