// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered settings: flag > environment > config file > default

use crate::error::CliError;
use rlock_engine::DEFAULT_TICKET_FILE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_ATTEMPTS: u32 = 120;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "RLOCK_CONFIG";

/// Contents of `config.toml`
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub server_url: Option<String>,
    pub token: Option<String>,
    pub interval: Option<u64>,
    pub attempts: Option<u32>,
    pub resume_on_connection_error: Option<bool>,
    pub request_timeout: Option<u64>,
    pub ticket_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::usage(format!("cannot read config {}: {e}", path.display()))
        })?;
        toml::from_str(&text).map_err(|e| {
            CliError::usage(format!("invalid config {}", path.display()))
                .with_context(e.to_string())
        })
    }

    /// Load the explicit file, or the per-user default if it exists
    pub fn discover(explicit: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "using default config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/rlock/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rlock").join("config.toml"))
}

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub token: Option<String>,
    pub interval: Option<u64>,
    pub attempts: Option<u32>,
    pub resume_on_connection_error: bool,
    pub request_timeout: Option<u64>,
    pub ticket_file: Option<PathBuf>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub token: String,
    pub interval: Duration,
    pub attempts: u32,
    pub resume_on_connection_error: bool,
    pub request_timeout: Duration,
    pub ticket_file: PathBuf,
}

impl Settings {
    /// Resolve from the process environment
    pub fn load(flags: &Overrides, file: &FileConfig) -> Result<Self, CliError> {
        Self::resolve(flags, |key| std::env::var(key).ok(), file)
    }

    pub fn resolve(
        flags: &Overrides,
        env: impl Fn(&str) -> Option<String>,
        file: &FileConfig,
    ) -> Result<Self, CliError> {
        let server_url = flags
            .server_url
            .clone()
            .or_else(|| env("RLOCK_SERVER_URL"))
            .or_else(|| file.server_url.clone())
            .ok_or_else(|| missing("broker URL", "--server-url", "RLOCK_SERVER_URL"))?;
        let token = flags
            .token
            .clone()
            .or_else(|| env("RLOCK_TOKEN"))
            .or_else(|| file.token.clone())
            .ok_or_else(|| missing("API token", "--token", "RLOCK_TOKEN"))?;

        let interval = pick(flags.interval, &env, "RLOCK_INTERVAL", file.interval)?
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        if interval == 0 {
            return Err(CliError::usage("interval must be at least 1 second"));
        }
        let attempts = pick(flags.attempts, &env, "RLOCK_ATTEMPTS", file.attempts)?
            .unwrap_or(DEFAULT_ATTEMPTS);
        if attempts == 0 {
            return Err(CliError::usage("attempts must be at least 1"));
        }
        let request_timeout = pick(
            flags.request_timeout,
            &env,
            "RLOCK_REQUEST_TIMEOUT",
            file.request_timeout,
        )?
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout == 0 {
            return Err(CliError::usage("request timeout must be at least 1 second"));
        }

        let resume_on_connection_error = if flags.resume_on_connection_error {
            true
        } else {
            pick(
                None,
                &env,
                "RLOCK_RESUME_ON_CONNECTION_ERROR",
                file.resume_on_connection_error,
            )?
            .unwrap_or(false)
        };

        let ticket_file = flags
            .ticket_file
            .clone()
            .or_else(|| env("RLOCK_TICKET_FILE").map(PathBuf::from))
            .or_else(|| file.ticket_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TICKET_FILE));

        Ok(Self {
            server_url,
            token,
            interval: Duration::from_secs(interval),
            attempts,
            resume_on_connection_error,
            request_timeout: Duration::from_secs(request_timeout),
            ticket_file,
        })
    }
}

fn pick<T: FromStr>(
    flag: Option<T>,
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    file: Option<T>,
) -> Result<Option<T>, CliError> {
    if flag.is_some() {
        return Ok(flag);
    }
    if let Some(raw) = env(key) {
        let value = raw
            .trim()
            .parse()
            .map_err(|_| CliError::usage(format!("invalid value for {key}: {raw:?}")))?;
        return Ok(Some(value));
    }
    Ok(file)
}

fn missing(what: &str, flag: &str, var: &str) -> CliError {
    CliError::usage(format!("no {what} configured"))
        .with_suggestion(format!("pass {flag}"))
        .with_suggestion(format!("or set {var}"))
        .with_suggestion("or add it to the rlock config.toml")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
