// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rlock abort-recorded`: abort the ticket named in the record file

use super::{connect, unless_cancelled};
use crate::config::Settings;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use clap::Args;
use rlock_core::CancelToken;
use rlock_engine::{TicketRecord, CANCEL_REASON};
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct AbortRecordedArgs {
    /// Reason stored on the aborted ticket
    #[arg(long, default_value = CANCEL_REASON)]
    pub reason: String,
}

pub fn handle(
    args: AbortRecordedArgs,
    settings: &Settings,
    cancel: &CancelToken,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let record = TicketRecord::new(&settings.ticket_file);
    let ticket_id = record
        .read()?
        .ok_or_else(|| CliError::nothing_recorded(record.path()))?;

    let client = connect(settings, cancel)?;
    unless_cancelled(client.abort(&ticket_id, &args.reason), cancel)?;

    match format {
        OutputFormat::Text => println!("Aborted ticket {ticket_id}"),
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "id": ticket_id,
            "status": "ABORTED",
            "description": args.reason,
        })),
    }
    Ok(ExitCode::SUCCESS)
}
