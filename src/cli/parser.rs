use crate::export::OutputFormat;
use crate::logging::{LogHandler, LogLevel};
use crate::utils::date::today;
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for worknight
/// CLI application to fill and inspect Workday timesheets and absences
#[derive(Parser, Debug)]
#[command(
    name = "worknight",
    version = env!("CARGO_PKG_VERSION"),
    about = "Automate the Workday time and absence modules from the command line",
    long_about = None
)]
pub struct Cli {
    /// Use another configuration file
    #[arg(global = true, long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub dev: DevOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Development options, shared by every command.
#[derive(Args, Debug, Clone)]
#[command(next_help_heading = "Development")]
pub struct DevOptions {
    /// Select the logging handler
    #[arg(global = true, long, value_enum, default_value_t = LogHandler::Console)]
    pub log_handler: LogHandler,

    /// Logging level (RUST_LOG takes precedence)
    #[arg(global = true, long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Display browser window during execution
    #[arg(global = true, long)]
    pub no_headless: bool,

    /// Open Developer console during execution, implies --no-headless
    #[arg(global = true, long)]
    pub browser_dev_console: bool,

    /// Leave the browser open when the command finishes
    #[arg(global = true, long)]
    pub no_browser_close_on_finish: bool,

    /// Path to a directory with browser profile. If not set, profile is created automatically
    #[arg(global = true, long, value_name = "DIR", value_parser = existing_dir)]
    pub browser_profile_path: Option<PathBuf>,

    /// Annotate actions as they are being performed
    #[arg(global = true, long)]
    pub annotate_actions: bool,

    /// Display the chain of causes if the command fails
    #[arg(global = true, long)]
    pub show_traceback: bool,
}

impl DevOptions {
    pub fn headless(&self) -> bool {
        !(self.no_headless || self.browser_dev_console)
    }
}

fn existing_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("directory '{s}' does not exist"))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Operations of the time module
    Time {
        #[command(subcommand)]
        action: TimeCommands,
    },

    /// Operations of the absence module
    Absence {
        #[command(subcommand)]
        action: AbsenceCommands,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum TimeCommands {
    /// Autofill operations of the time module
    Autofill {
        #[command(subcommand)]
        period: AutofillPeriod,
    },

    /// List operations of the time module
    List {
        #[command(subcommand)]
        period: ListPeriod,
    },
}

#[derive(Subcommand, Debug)]
pub enum AutofillPeriod {
    /// Automatically fills timesheet for the current week
    Week(DayArgs),
    /// Automatically fills timesheet for the current month
    Month(MonthArgs),
}

#[derive(Subcommand, Debug)]
pub enum ListPeriod {
    /// List timesheet of the current week
    Week {
        #[command(flatten)]
        day: DayArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List timesheet of the current month
    Month {
        #[command(flatten)]
        month: MonthArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum AbsenceCommands {
    /// List absences of the current month
    List {
        #[command(flatten)]
        month: MonthArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Section the key lives in, repeat for nesting
        /// (e.g. --parent browser_configuration --parent firefox)
        #[arg(long = "parent", value_name = "SECTION")]
        parents: Vec<String>,
        key: String,
        value: String,
    },

    /// Print the current configuration file
    Print,

    /// Edit the configuration file (default editor: $EDITOR, or nano/notepad)
    Edit {
        #[arg(long, help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct MonthArgs {
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12), default_value_t = today().month())]
    pub month: u32,

    #[arg(long, value_parser = clap::value_parser!(i32).range(1993..), default_value_t = today().year())]
    pub year: i32,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct DayArgs {
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31), default_value_t = today().day())]
    pub day: u32,

    #[command(flatten)]
    pub month: MonthArgs,
}
