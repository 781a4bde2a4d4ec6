//! Page-level automation of the Workday portal.
//!
//! [`Navigator`](navigation::Navigator) holds the shared navigation
//! capability; [`AbsenceScanner`](absence::AbsenceScanner) and
//! [`TimeSheet`](time::TimeSheet) borrow it.

pub mod absence;
pub mod navigation;
pub mod session;
pub mod time;

pub use absence::AbsenceScanner;
pub use navigation::{Direction, Navigator};
pub use session::{BrowserOptions, BrowserSession};
pub use time::TimeSheet;
