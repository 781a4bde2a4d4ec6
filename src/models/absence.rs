use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Hours of a standard workday; also the default hours of an absence day.
pub const DEFAULT_WORKDAY_HOURS: u32 = 8;

/// The part of an absence that two assertions about one day must agree on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbsenceAttributes {
    #[serde(rename = "type")]
    pub leave_type: String,
    pub hours: u32,
    pub comment: Option<String>,
}

impl AbsenceAttributes {
    pub fn new(leave_type: impl Into<String>, hours: u32, comment: Option<String>) -> Self {
        Self {
            leave_type: leave_type.into(),
            hours,
            comment,
        }
    }
}

impl fmt::Display for AbsenceAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.comment {
            Some(c) => write!(
                f,
                "{{type: {}, hours: {}, comment: {:?}}}",
                self.leave_type, self.hours, c
            ),
            None => write!(
                f,
                "{{type: {}, hours: {}, comment: None}}",
                self.leave_type, self.hours
            ),
        }
    }
}

/// One absence day of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbsenceEntry {
    pub date: NaiveDate, // key, rendered as "YYYY-MM-DD"
    #[serde(flatten)]
    pub attributes: AbsenceAttributes,
}

impl AbsenceEntry {
    pub fn leave_type(&self) -> &str {
        &self.attributes.leave_type
    }

    pub fn hours(&self) -> u32 {
        self.attributes.hours
    }

    pub fn comment(&self) -> Option<&str> {
        self.attributes.comment.as_deref()
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
