use chrono::NaiveDate;
use serde::Serialize;

/// Result of filling a whole month from prior weeks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutofillReport {
    pub weeks_filled: usize,
    /// Days that carry both a full-day absence and a daily time event.
    pub absence_collisions: Vec<NaiveDate>,
}

impl AutofillReport {
    pub fn is_clean(&self) -> bool {
        self.absence_collisions.is_empty()
    }
}
