use crate::errors::{AppError, AppResult};
use crate::models::absence::{AbsenceAttributes, AbsenceEntry, DEFAULT_WORKDAY_HOURS};
use crate::models::date_range::DateRange;
use crate::models::workday_info::WorkdayInfo;
use crate::utils::date::{DateOrder, DateParser, Language, parse_dmy_slashed, parse_iso_date};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::btree_map::Entry;
use std::sync::LazyLock;
use tracing::{debug, trace};

static RANGE_TO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+to\s+").expect("range regex is valid"));

pub const FIRST_DAY_KEY: &str = "First Day of Absence";
pub const LAST_DAY_KEY: &str = "Actual Last Day of Absence";
pub const TYPE_KEY: &str = "Type";

/// Values a ledger can be queried with.
pub trait QueryDate {
    fn query_date(&self) -> AppResult<NaiveDate>;
}

impl QueryDate for NaiveDate {
    fn query_date(&self) -> AppResult<NaiveDate> {
        Ok(*self)
    }
}

impl QueryDate for NaiveDateTime {
    fn query_date(&self) -> AppResult<NaiveDate> {
        Ok(self.date())
    }
}

/// Only `YYYY-MM-DD` is accepted.
impl QueryDate for str {
    fn query_date(&self) -> AppResult<NaiveDate> {
        parse_iso_date(self).map_err(|_| {
            AppError::InvalidDate(format!(
                "query date must be a date or a string in the format 'YYYY-MM-DD': {self}"
            ))
        })
    }
}

impl QueryDate for String {
    fn query_date(&self) -> AppResult<NaiveDate> {
        self.as_str().query_date()
    }
}

/// Day-indexed absence ledger of one scan.
///
/// Every ingestion path expands into single days. A day is stored once; a
/// later assertion for the same day must carry identical attributes or the
/// call fails with [`AppError::Conflict`].
#[derive(Debug, Clone)]
pub struct AbsenceRecord {
    absences: BTreeMap<NaiveDate, AbsenceEntry>,
    parser: DateParser,
}

impl Default for AbsenceRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl AbsenceRecord {
    pub fn new() -> Self {
        Self::with_language(Language::English)
    }

    pub fn with_language(language: Language) -> Self {
        Self {
            absences: BTreeMap::new(),
            parser: DateParser::new(language).with_order(DateOrder::Ymd),
        }
    }

    /// Ingest a calendar event label:
    /// `Approved | Annual Leave | Thursday, 1 February 2024 to Friday, 2 February 2024`.
    pub fn add_from_label(&mut self, label: &str, hours: u32) -> AppResult<()> {
        let parts: Vec<&str> = label.split('|').map(str::trim).collect();
        let [status, leave_type, when] = parts.as_slice() else {
            return Err(AppError::Format(format!(
                "Unexpected number of parts in absence label: {label}"
            )));
        };

        let dates: Vec<&str> = RANGE_TO_RE.split(when).collect();
        let (first, last) = match dates.as_slice() {
            [single] => {
                let d = self.parser.parse_date(single)?;
                (d, d)
            }
            [from, to] => (self.parser.parse_date(from)?, self.parser.parse_date(to)?),
            _ => {
                return Err(AppError::Format(format!(
                    "Unexpected absence date range: {when}"
                )));
            }
        };

        debug!(status = *status, leave_type = *leave_type, %first, %last, "absence label");
        self.add_absence(first, last, AbsenceAttributes::new(*leave_type, hours, None))
    }

    /// Ingest the field/value pairs of an absence detail dialog.
    pub fn add_from_details(&mut self, details: &HashMap<String, String>) -> AppResult<()> {
        let field = |key: &str| {
            details
                .get(key)
                .map(String::as_str)
                .ok_or_else(|| AppError::Format(format!("Absence details are missing '{key}'")))
        };

        let first = parse_dmy_slashed(field(FIRST_DAY_KEY)?)?;
        let last = parse_dmy_slashed(field(LAST_DAY_KEY)?)?;
        let leave_type = field(TYPE_KEY)?;

        self.add_absence(
            first,
            last,
            AbsenceAttributes::new(leave_type, DEFAULT_WORKDAY_HOURS, None),
        )
    }

    /// Ingest a single day read from a leave table row; `hours` is `"<integer> Hours"`.
    pub fn add_from_args(
        &mut self,
        date: &str,
        leave_type: &str,
        hours: &str,
        comment: Option<&str>,
    ) -> AppResult<()> {
        let day = self.parser.parse_date(date)?;
        let hours = parse_hours(hours)?;
        self.add_absence(
            day,
            day,
            AbsenceAttributes::new(leave_type, hours, comment.map(str::to_string)),
        )
    }

    /// Assert `attributes` for every day of `[first, last]`.
    ///
    /// Stops at the first conflicting day; days before it stay recorded.
    pub fn add_absence(
        &mut self,
        first: NaiveDate,
        last: NaiveDate,
        attributes: AbsenceAttributes,
    ) -> AppResult<()> {
        let range = DateRange::new(first, last)?;

        for day in range.days() {
            match self.absences.entry(day) {
                Entry::Occupied(existing) => {
                    if existing.get().attributes != attributes {
                        return Err(AppError::Conflict {
                            date: day,
                            existing: existing.get().attributes.clone(),
                            new: attributes,
                        });
                    }
                    trace!(%day, "absence already recorded");
                }
                Entry::Vacant(slot) => {
                    slot.insert(AbsenceEntry {
                        date: day,
                        attributes: attributes.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Absent and worked hours of one day, out of an 8-hour workday.
    pub fn workday_info<Q: QueryDate + ?Sized>(&self, query: &Q) -> AppResult<WorkdayInfo> {
        let day = query.query_date()?;
        let entry = self.absences.get(&day);
        let absent_hours = entry.map_or(0, AbsenceEntry::hours);

        Ok(WorkdayInfo {
            absent_hours,
            worked_hours: DEFAULT_WORKDAY_HOURS.saturating_sub(absent_hours),
            comment: entry.and_then(|e| e.attributes.comment.clone()),
        })
    }

    pub fn get(&self, day: NaiveDate) -> Option<&AbsenceEntry> {
        self.absences.get(&day)
    }

    /// Entries in date order.
    pub fn entries(&self) -> impl Iterator<Item = &AbsenceEntry> {
        self.absences.values()
    }

    pub fn len(&self) -> usize {
        self.absences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.absences.is_empty()
    }
}

/// `"8 Hours"` → 8. Fractional values are rejected.
pub fn parse_hours(text: &str) -> AppResult<u32> {
    text.split_whitespace()
        .next()
        .and_then(|n| n.parse::<u32>().ok())
        .ok_or_else(|| AppError::InvalidHours(text.to_string()))
}
