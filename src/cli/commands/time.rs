use crate::cli::parser::{AutofillPeriod, Cli, ListPeriod, TimeCommands};
use crate::config::ConfigFile;
use crate::errors::{AppError, AppResult};
use crate::export::{OutputFormat, event_warnings, write_events};
use crate::models::calendar_event::CalendarEvents;
use crate::ui::messages;
use crate::workday::TimeSheet;
use std::io;

pub fn handle(cmd: &TimeCommands, cli: &Cli, file: &ConfigFile) -> AppResult<()> {
    match cmd {
        TimeCommands::Autofill { period } => autofill(period, cli, file),
        TimeCommands::List { period } => list(period, cli, file),
    }
}

fn autofill(period: &AutofillPeriod, cli: &Cli, file: &ConfigFile) -> AppResult<()> {
    match period {
        AutofillPeriod::Week(args) => {
            let events = super::with_portal(cli, file, |nav, language| {
                let sheet = TimeSheet::new(nav, language);
                let (y, m, d) = (args.month.year, args.month.month, args.day);
                sheet.autofill_week(y, m, d)?;
                messages::success("Week auto filled. Listing the week.");
                sheet.list_weekly(y, m, d)
            })?;
            // a filled week must not carry hours on daily events
            if events.daily.iter().any(|e| !e.subtitle2.is_empty()) {
                warn_about(&events);
                return Err(AppError::Format(
                    "Daily event has unexpected nonempty subtitle2".into(),
                ));
            }
            print_events(&events, OutputFormat::Text)
        }
        AutofillPeriod::Month(args) => {
            let (report, events) = super::with_portal(cli, file, |nav, language| {
                let sheet = TimeSheet::new(nav, language);
                let report = sheet.autofill_month(args.year, args.month)?;
                messages::success("Month auto filled. Listing the month.");
                Ok((report, sheet.list_monthly(args.year, args.month)?))
            })?;
            for day in &report.absence_collisions {
                messages::warning(format!(
                    "{day} has a full-day absence and a daily time event"
                ));
            }
            print_events(&events, OutputFormat::Text)
        }
    }
}

fn list(period: &ListPeriod, cli: &Cli, file: &ConfigFile) -> AppResult<()> {
    let (events, format) = match period {
        ListPeriod::Week { day, format } => {
            let events = super::with_portal(cli, file, |nav, language| {
                TimeSheet::new(nav, language).list_weekly(day.month.year, day.month.month, day.day)
            })?;
            (events, *format)
        }
        ListPeriod::Month { month, format } => {
            let events = super::with_portal(cli, file, |nav, language| {
                TimeSheet::new(nav, language).list_monthly(month.year, month.month)
            })?;
            (events, *format)
        }
    };
    print_events(&events, format)
}

fn warn_about(events: &CalendarEvents) {
    for warning in event_warnings(events) {
        messages::warning(warning);
    }
}

fn print_events(events: &CalendarEvents, format: OutputFormat) -> AppResult<()> {
    warn_about(events);
    write_events(&mut io::stdout().lock(), events, format)
}
