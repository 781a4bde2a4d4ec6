pub mod absence;
pub mod autofill_report;
pub mod calendar_event;
pub mod date_range;
pub mod workday_info;
