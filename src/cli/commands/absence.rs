use crate::cli::parser::{AbsenceCommands, Cli};
use crate::config::ConfigFile;
use crate::errors::AppResult;
use crate::export::write_absences;
use crate::workday::AbsenceScanner;
use std::io;

pub fn handle(cmd: &AbsenceCommands, cli: &Cli, file: &ConfigFile) -> AppResult<()> {
    let AbsenceCommands::List { month, format } = cmd;

    let record = super::with_portal(cli, file, |nav, language| {
        AbsenceScanner::new(nav, language).absences(month.year, month.month)
    })?;

    write_absences(&mut io::stdout().lock(), &record, *format)
}
