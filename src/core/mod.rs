pub mod absence_record;
pub mod date_range;
pub mod scrape;

pub use absence_record::{AbsenceRecord, QueryDate};
pub use date_range::parse_date_range;
