use serde::Serialize;

/// Answer of a ledger query for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkdayInfo {
    pub absent_hours: u32,
    pub worked_hours: u32,
    pub comment: Option<String>,
}
