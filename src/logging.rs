//! Logging setup.
//!
//! [`init`] installs the global `tracing` subscriber. It is called once by
//! `run()`; a later call finds the subscriber already installed and returns
//! a handle saying so instead of replacing it.

use crate::errors::AppResult;
use clap::ValueEnum;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "worknight.log";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogHandler {
    /// Human-readable lines on stderr
    #[default]
    Console,
    /// Append to worknight.log in the configuration directory
    File,
    /// Discard all log output
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// What [`init`] set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingHandle {
    pub handler: LogHandler,
    pub level: LogLevel,
    pub file: Option<PathBuf>,
    /// False when another subscriber was already installed.
    pub installed: bool,
}

fn filter(level: LogLevel) -> EnvFilter {
    // RUST_LOG wins over --log-level
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("worknight={}", level.as_str())))
}

pub fn init(handler: LogHandler, level: LogLevel, log_dir: &Path) -> AppResult<LoggingHandle> {
    let mut handle = LoggingHandle {
        handler,
        level,
        file: None,
        installed: false,
    };

    let result = match handler {
        LogHandler::None => return Ok(handle),
        LogHandler::Console => tracing_subscriber::fmt()
            .with_env_filter(filter(level))
            .with_writer(std::io::stderr)
            .try_init(),
        LogHandler::File => {
            fs::create_dir_all(log_dir)?;
            let path = log_dir.join(LOG_FILE_NAME);
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            handle.file = Some(path);
            tracing_subscriber::fmt()
                .with_env_filter(filter(level))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    handle.installed = result.is_ok();
    Ok(handle)
}
