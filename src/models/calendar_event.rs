use crate::errors::AppResult;
use crate::models::date_range::DateRange;
use crate::utils::date::parse_event_timestamp;
use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

/// One appointment of the time-tracking calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,     // e.g. "Regular/Time Worked"
    pub subtitle: String,  // e.g. "09:00 - 13:00 (Meal)"
    pub subtitle2: String, // e.g. "4 Hours"
}

impl CalendarEvent {
    /// Build an event from the scraped `data-automation-startdate` /
    /// `data-automation-enddate` attributes (`M-D-H-M`, no year) and the
    /// three text lines. The year comes from the displayed week.
    pub fn from_attributes(
        start_attr: &str,
        end_attr: &str,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        subtitle2: impl Into<String>,
        shown: &DateRange,
    ) -> AppResult<Self> {
        Ok(Self {
            start: parse_event_timestamp(start_attr, shown)?,
            end: parse_event_timestamp(end_attr, shown)?,
            title: title.into(),
            subtitle: subtitle.into(),
            subtitle2: subtitle2.into(),
        })
    }

    pub fn spans_multiple_days(&self) -> bool {
        self.start.date() != self.end.date()
    }

    /// Both ends inside the given month.
    pub fn within_month(&self, year: i32, month: u32) -> bool {
        let inside = |t: &NaiveDateTime| t.year() == year && t.month() == month;
        inside(&self.start) && inside(&self.end)
    }
}

/// Events of one listing: whole-day entries and the user's own time blocks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CalendarEvents {
    pub daily: Vec<CalendarEvent>,
    pub own: Vec<CalendarEvent>,
}

impl CalendarEvents {
    pub fn extend(&mut self, other: CalendarEvents) {
        self.daily.extend(other.daily);
        self.own.extend(other.own);
    }
}
