// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rlock release`: free the resource held under a signoff

use super::{connect, unless_cancelled};
use crate::config::Settings;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use clap::Args;
use rlock_core::CancelToken;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct ReleaseArgs {
    /// Signoff the resource was locked with
    #[arg(value_name = "SIGN_OFF")]
    pub signoff: String,
}

pub fn handle(
    args: ReleaseArgs,
    settings: &Settings,
    cancel: &CancelToken,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let client = connect(settings, cancel)?;

    match unless_cancelled(client.release_by_signoff(&args.signoff), cancel)? {
        Some(resource) => match format {
            OutputFormat::Text => println!("Released {} successfully!", resource.name),
            OutputFormat::Json => output::print_json(&resource),
        },
        None => match format {
            OutputFormat::Text => {
                println!("There is no resource locked under {}, ignoring!", args.signoff)
            }
            OutputFormat::Json => output::print_json(&serde_json::Value::Null),
        },
    }
    Ok(ExitCode::SUCCESS)
}
