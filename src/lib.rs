//! worknight library root.
//! Exposes the CLI parser, the high-level run() function and the modules
//! that drive the Workday portal.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;
pub mod webdriver;
pub mod workday;

use cli::parser::{Cli, Commands};
use config::{Config, ConfigFile};
use errors::AppResult;
use std::path::Path;
use tracing::debug;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, file: &mut ConfigFile) -> AppResult<()> {
    match &cli.command {
        Commands::Time { action } => cli::commands::time::handle(action, cli, file),
        Commands::Absence { action } => cli::commands::absence::handle(action, cli, file),
        Commands::Config { action } => cli::commands::config::handle(action, file),
    }
}

/// Entry point used by main.rs
pub fn run(cli: &Cli) -> AppResult<()> {
    let path = cli.config.clone().unwrap_or_else(Config::config_file);
    let log_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_dir);

    let handle = logging::init(cli.dev.log_handler, cli.dev.log_level, &log_dir)?;
    debug!(?handle, config = %path.display(), "starting");

    let mut file = ConfigFile::open(path)?;
    dispatch(cli, &mut file)
}
