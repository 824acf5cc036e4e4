// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rlock - resource locker client

mod commands;
mod completions;
mod config;
mod error;
mod logging;
mod output;
mod signals;

use clap::{Args, Parser, Subcommand};
use commands::{abort_recorded, check, lock, release};
use completions::CompletionsArgs;
use config::{FileConfig, Overrides, Settings};
use error::{exit_code, CliError};
use output::OutputFormat;
use rlock_core::CancelToken;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "rlock",
    version,
    about = "Lock shared resources through a resource locker broker"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// URL of the resource locker server
    #[arg(short, long, global = true)]
    server_url: Option<String>,

    /// API token used for every call
    #[arg(short, long, global = true)]
    token: Option<String>,

    /// Seconds between checks [default: 15]
    #[arg(short, long, global = true)]
    interval: Option<u64>,

    /// Wait out broker outages instead of failing
    #[arg(long, global = true)]
    resume_on_connection_error: bool,

    /// Seconds to wait for any single broker response [default: 30]
    #[arg(long, global = true)]
    request_timeout: Option<u64>,

    /// File the queued ticket id is written to [default: queue_id.log]
    #[arg(long, global = true)]
    ticket_file: Option<PathBuf>,

    /// Config file [default: $RLOCK_CONFIG, then <config dir>/rlock/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t)]
    format: OutputFormat,

    /// Log progress details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

impl GlobalArgs {
    fn overrides(&self, attempts: Option<u32>) -> Overrides {
        Overrides {
            server_url: self.server_url.clone(),
            token: self.token.clone(),
            interval: self.interval,
            attempts,
            resume_on_connection_error: self.resume_on_connection_error,
            request_timeout: self.request_timeout,
            ticket_file: self.ticket_file.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Queue a lock request and wait until it is granted
    Lock(lock::LockArgs),
    /// Release the resource locked under a signoff
    Release(release::ReleaseArgs),
    /// Show resources matching a name or label
    Check(check::CheckArgs),
    /// Abort the ticket recorded by a previous `lock`
    AbortRecorded(abort_recorded::AbortRecordedArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging::init(cli.global.verbose, cli.global.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(exit_code::FAILURE);
        }
    };

    match run(cli) {
        Ok(code) => code,
        Err(err) if err.code == exit_code::SUCCESS => {
            eprintln!("{}", err.message);
            err.exit_code()
        }
        Err(err) => {
            eprint!("{err}");
            err.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let Cli { global, command } = cli;

    let attempts = match &command {
        Commands::Completions(args) => {
            completions::generate_completions::<Cli>(args.shell);
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Lock(args) => args.attempts,
        _ => None,
    };

    let config_path = global
        .config
        .clone()
        .or_else(|| std::env::var_os(config::CONFIG_ENV).map(PathBuf::from));
    let file = FileConfig::discover(config_path.as_deref())?;
    let settings = Settings::load(&global.overrides(attempts), &file)?;
    tracing::debug!(
        server_url = %settings.server_url,
        interval = settings.interval.as_secs(),
        attempts = settings.attempts,
        resume = settings.resume_on_connection_error,
        "settings resolved"
    );

    let cancel = CancelToken::new();
    signals::install(cancel.clone())
        .map_err(|e| CliError::new(format!("cannot install signal handler: {e}")))?;

    let format = global.format;
    match command {
        Commands::Lock(args) => lock::handle(args, &settings, &cancel, format),
        Commands::Release(args) => release::handle(args, &settings, &cancel, format),
        Commands::Check(args) => check::handle(args, &settings, &cancel, format),
        Commands::AbortRecorded(args) => abort_recorded::handle(args, &settings, &cancel, format),
        Commands::Completions(_) => Ok(ExitCode::SUCCESS),
    }
}
