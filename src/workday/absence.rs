use crate::core::absence_record::AbsenceRecord;
use crate::core::scrape::{ClickableAbsence, normalize_comment};
use crate::errors::{AppError, AppResult};
use crate::models::absence::DEFAULT_WORKDAY_HOURS;
use crate::utils::date::{DateParser, Language};
use crate::webdriver::retry::{self, Retry};
use crate::webdriver::{Element, WebDriverErrorKind};
use crate::workday::navigation::{Direction, Navigator};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error};

/// The absence calendar is reachable at most this many months away.
const MAX_MONTH_STEPS: usize = 12;

const CALENDAR_EVENT_DIV: &str = "//div[@data-automation-id='calendarevent']";
const CALENDAR_EVENT_BUTTON: &str = "//button[@data-automation-id='calendarevent']";
const CLOSE_BUTTON: &str = ".//button[@data-automation-id='closeButton']";

/// Reads the "Correct My Absence" calendar into an [`AbsenceRecord`].
pub struct AbsenceScanner<'n, 'd> {
    nav: &'n Navigator<'d>,
    language: Language,
}

impl<'n, 'd> AbsenceScanner<'n, 'd> {
    pub fn new(nav: &'n Navigator<'d>, language: Language) -> Self {
        Self { nav, language }
    }

    /// All absences shown for `month` of `year`.
    pub fn absences(&self, year: i32, month: u32) -> AppResult<AbsenceRecord> {
        let requested = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::InvalidDate(format!("{year}-{month}")))?;

        self.nav.ensure_on_workday_url()?;
        self.nav.dismiss_session_expiration()?;
        self.nav.hamburger_menu("Absence")?;

        self.nav.annotate("Clicking on Correct My Absence");
        self.nav
            .wait()
            .clickable("//a[@title='Correct My Absence']")?
            .click()?;

        self.go_to_month(requested)?;

        // calendar redraw settles down
        self.nav
            .wait()
            .presence("//div[@data-automation-calendarnavigationoverlayhidden='true']")?;

        let mut record = AbsenceRecord::with_language(self.language);
        let driver = self.nav.driver();

        for event in driver.find_all(CALENDAR_EVENT_DIV)? {
            let label = event.attribute("aria-label")?.unwrap_or_default();
            debug!(%label, "adding automatic absence event");
            record.add_from_label(&label, DEFAULT_WORKDAY_HOURS)?;
        }

        for button in driver.find_all(CALENDAR_EVENT_BUTTON)? {
            let label = button.attribute("aria-label")?.unwrap_or_default();
            match ClickableAbsence::from_label(&label)? {
                ClickableAbsence::SickDays => self.nav.annotate("Adding Sick Days"),
                ClickableAbsence::CzeSickLeave => self.add_cze_sick_leave(&button, &mut record)?,
                ClickableAbsence::AnnualLeave => self.add_annual_leave(&button, &mut record)?,
            }
        }

        Ok(record)
    }

    fn go_to_month(&self, requested: NaiveDate) -> AppResult<()> {
        let parser = DateParser::new(self.language);
        for _ in 0..=MAX_MONTH_STEPS {
            let title = self.nav.date_range_title()?;
            let shown = parser.parse_month_start(&title)?;
            let direction = match shown.cmp(&requested) {
                Ordering::Equal => return Ok(()),
                Ordering::Less => Direction::Next,
                Ordering::Greater => Direction::Prev,
            };
            self.nav.annotate(format!("Currently present on date: {title}"));
            self.nav.navigate_calendar(direction)?;
        }
        Err(AppError::Navigation(
            "Failed to get to the correct date after too many tries.".into(),
        ))
    }

    fn add_cze_sick_leave(&self, button: &Element<'d>, record: &mut AbsenceRecord) -> AppResult<()> {
        self.nav.annotate("Adding CZE sick leave");
        button.click()?;
        let dialog = self
            .nav
            .wait()
            .visible("//div[@role='dialog' and @data-automation-widget='wd-popup']")?;

        // First Day of Absence: 08/01/2024, Actual Last Day of Absence: 15/01/2024, Type: ...
        let mut details = HashMap::new();
        for li in dialog.find_all(".//ul[@role='presentation']/li")? {
            let label = li.find_optional(".//label")?;
            let value = li.find_optional(
                ".//div[@data-automation-id='textView' or @data-automation-id='promptOption']",
            )?;
            if let (Some(label), Some(value)) = (label, value) {
                details.insert(label.text()?, value.text()?);
            }
        }
        record.add_from_details(&details)?;

        dialog.find(CLOSE_BUTTON)?.click()
    }

    fn add_annual_leave(&self, button: &Element<'d>, record: &mut AbsenceRecord) -> AppResult<()> {
        debug!("adding annual leave");
        Retry::exponential("open annual leave", 3)
            .run(retry::on(&[WebDriverErrorKind::ElementClickIntercepted]), || {
                button.scroll_into_view()?;
                button.click()
            })
            .inspect_err(|e| error!(error = %e, "Failed to click on button Annual Leave after retries."))?;

        let dialog = self
            .nav
            .wait()
            .visible("//div[@data-automation-id='popUpDialog']")?;

        let row = Retry::constant("annual leave row", Duration::from_secs(3))
            .until_some(|| annual_leave_row(&dialog))?
            .ok_or_else(|| AppError::Format("Unable to process annual leave row".into()))?;

        let AnnualLeaveRow {
            date,
            leave_type,
            hours,
            comment,
        } = row;
        record.add_from_args(&date, &leave_type, &hours, comment.as_deref())?;

        dialog.find(CLOSE_BUTTON)?.click()
    }
}

struct AnnualLeaveRow {
    date: String,       // Thursday, 1 February 2024
    leave_type: String, // Annual Leave
    hours: String,      // 8 Hours
    comment: Option<String>,
}

/// First row of the leave table, `None` while it is still rendering.
fn annual_leave_row(dialog: &Element<'_>) -> AppResult<Option<AnnualLeaveRow>> {
    let rows = dialog.find_all(".//div[@data-automation-id='MainTable-0']//tbody/tr")?;
    let Some(tr) = rows.first() else {
        return Ok(None);
    };

    let date = tr.find("./th//div[@data-automation-id='textView']")?.text()?;
    if date.is_empty() {
        return Ok(None);
    }
    let leave_type = tr.find("./td//div[@data-automation-id='promptOption']")?.text()?;
    let hours = tr.find("./td//div[@data-automation-id='textView']")?.text()?;
    let comment = match dialog
        .find_optional(".//li[descendant::label[contains(text(),'Comment')]]//input")?
    {
        Some(input) => normalize_comment(input.property("value")?),
        None => None,
    };

    Ok(Some(AnnualLeaveRow {
        date,
        leave_type,
        hours,
        comment,
    }))
}
