use crate::errors::{AppError, AppResult};
use crate::models::date_range::DateRange;
use crate::utils::date::DateParser;
use chrono::{Datelike, NaiveDate};

/// EN DASH (U+2013), the separator of calendar header ranges.
pub const EN_DASH: char = '\u{2013}';
const SPACED_EN_DASH: &str = " \u{2013} ";

/// Parse the week header of the time calendar into a [`DateRange`].
///
/// Recognized shapes:
/// - `1–7 Jan 2024`, `6.–12. 5. 2024`: start carries only the day
/// - `29 Jan – 4 Feb 2024`: start carries day and month, year of the end
/// - `26 Dec 2022 – 1 Jan 2023`: both ends are complete
///
/// Anything else is a format error.
pub fn parse_date_range(label: &str, parser: &DateParser) -> AppResult<DateRange> {
    let unknown = || AppError::Format(format!("Unknown time range format: {label}"));

    let parts: Vec<&str> = label.split(SPACED_EN_DASH).collect();
    match parts.as_slice() {
        [compact] => {
            let halves: Vec<&str> = compact.trim().split(EN_DASH).collect();
            let [first, second] = halves.as_slice() else {
                return Err(unknown());
            };
            let end = parser.parse_date(second)?;
            let start_day = parser.parse_day(first)?;
            let start = end
                .with_day(start_day)
                .ok_or_else(|| AppError::InvalidDate(first.trim().to_string()))?;
            DateRange::new(start, end)
        }
        [first, second] => {
            let end = parser.parse_date(second)?;
            let start = match first.split_whitespace().count() {
                2 => {
                    let (day, month) = parser.parse_day_month(first)?;
                    // `29 Dec – 4 Jan 2025` starts in the year before
                    let year = if month > end.month() { end.year() - 1 } else { end.year() };
                    NaiveDate::from_ymd_opt(year, month, day)
                        .ok_or_else(|| AppError::InvalidDate(first.trim().to_string()))?
                }
                3 => parser.parse_date(first)?,
                _ => return Err(unknown()),
            };
            DateRange::new(start, end)
        }
        _ => Err(unknown()),
    }
}
