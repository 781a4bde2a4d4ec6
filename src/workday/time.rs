use crate::core::date_range::parse_date_range;
use crate::core::scrape::{is_full_week_total, prior_week_options, prior_week_table_map};
use crate::errors::{AppError, AppResult};
use crate::models::autofill_report::AutofillReport;
use crate::models::calendar_event::{CalendarEvent, CalendarEvents};
use crate::models::date_range::DateRange;
use crate::ui::messages;
use crate::utils::date::{DateParser, Language};
use crate::webdriver::retry::{self, Retry};
use crate::webdriver::{Element, WebDriverErrorKind, xpath_literal};
use crate::workday::absence::AbsenceScanner;
use crate::workday::navigation::{Direction, Navigator};
use std::time::Duration;
use tracing::{debug, warn};

/// A month touches at most six calendar weeks.
const MAX_WEEKS: usize = 6;
const ENTRY_ATTEMPTS: usize = 5;
const STALE_BUDGET: Duration = Duration::from_secs(3);

const DAILY_EVENTS: &str =
    "//table[contains(@class, 'multiDayBody')]//div[@data-automation-id='calendarevent']";
const OWN_EVENTS: &str =
    "//div[contains(@class, 'gwt-appointment-panel')]//div[@data-automation-id='calendarevent']";
const ACTIVE_POPUP: &str = "//div[@data-automation-activepopup='true']";
const PRIOR_WEEK_SELECT: &str = "//li[descendant::label[contains(text(),'Select Prior Week')]]//div[@data-automation-id='selectSelectedOption']";
const PRIOR_WEEK_LIST: &str = "//ul[@aria-label='Select Prior Week']";
const PRIOR_WEEK_OPTIONS: &str =
    "//ul[@aria-label='Select Prior Week']//div[@data-automation-id='promptOption']";
const PRIOR_WEEK_TABLE: &str = "//div[@data-automation-id='rivaWidget']//table";
const AUTOFILL_PAGE: &str = "Auto-fill from Prior Week";
const ENTER_TIME_PAGE: &str = "Enter Time";

/// The weekly "Enter Time" calendar.
pub struct TimeSheet<'n, 'd> {
    nav: &'n Navigator<'d>,
    language: Language,
    parser: DateParser,
}

fn stale_retry(what: &str) -> Retry {
    Retry::constant(what, STALE_BUDGET)
}

impl<'n, 'd> TimeSheet<'n, 'd> {
    pub fn new(nav: &'n Navigator<'d>, language: Language) -> Self {
        Self {
            nav,
            language,
            parser: DateParser::new(language),
        }
    }

    fn enter_date_section(&self, value: &str, section: &str, parent: &Element<'d>) -> AppResult<()> {
        let input = format!(".//input[@data-automation-id='dateSection{section}-input']");
        let display = format!(
            "//div[@data-automation-id='dateSection{section}-display' and contains(text(),{})]",
            xpath_literal(value)
        );

        for attempt in 1..=ENTRY_ATTEMPTS {
            let input = parent.find(&input)?;
            input.scroll_into_view()?;
            input.move_and_click()?;
            input.send_keys(value)?;

            match self.nav.wait().presence(&display) {
                Ok(_) => return Ok(()),
                Err(AppError::Timeout { .. }) => {
                    warn!(attempt, section, "Retrying to enter a date section")
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::Navigation(format!(
            "Failed to enter a {section} even after retries"
        )))
    }

    fn enter_date(&self, year: i32, month: u32, day: u32, parent: &Element<'d>) -> AppResult<()> {
        let sections = [
            (format!("{day:02}"), "Day"),
            (format!("{month:02}"), "Month"),
            (format!("{year:04}"), "Year"),
        ];

        for attempt in 1..=ENTRY_ATTEMPTS {
            let entered = sections
                .iter()
                .try_for_each(|(value, section)| self.enter_date_section(value, section, parent))
                .and_then(|_| self.nav.click_ok_button(Some(parent)));
            match entered {
                Ok(()) => {}
                Err(e) if e.webdriver_kind() == Some(&WebDriverErrorKind::NoSuchElement) => {
                    warn!(attempt, error = %e, "Retrying to enter date");
                    continue;
                }
                Err(e) => return Err(e),
            }

            let canvas = match parent
                .find_optional(".//li[@data-automation-id='errorWidgetInlineMessageCanvas']")
            {
                Ok(None) => return Ok(()),
                // popup closed after OK
                Err(e) if e.webdriver_kind() == Some(&WebDriverErrorKind::StaleElementReference) => {
                    return Ok(());
                }
                Ok(Some(canvas)) => canvas,
                Err(e) => return Err(e),
            };
            let kind = canvas
                .find("./div[@data-automation-id='errorWidgetInlineMessageTypeTextCanvas']")?
                .text()?;
            let text = canvas
                .find("./div[@data-automation-id='errorWidgetInlineMessageTextCanvas']")?
                .text()?;
            messages::warning(format!("{kind}: {text}"));
        }
        Err(AppError::Navigation(
            "Failed to enter a date even after retries".into(),
        ))
    }

    fn navigate_to_week(&self, year: i32, month: u32, day: u32) -> AppResult<()> {
        self.nav
            .annotate(format!("Navigating to: {year}-{month}-{day}"));
        self.nav
            .wait()
            .clickable("//button[@title='Select Week']")?
            .click()?;
        let popup = self
            .nav
            .wait()
            .visible("//div[@data-automation-id='editPopup']")?;
        self.enter_date(year, month, day, &popup)
    }

    /// Open the time module on the week containing the given day.
    fn pre(&self, year: i32, month: u32, day: u32) -> AppResult<()> {
        self.nav.ensure_on_workday_url()?;
        self.nav.dismiss_session_expiration()?;
        self.nav.hamburger_menu("Time")?;
        self.navigate_to_week(year, month, day)
    }

    pub fn displayed_week(&self) -> AppResult<DateRange> {
        parse_date_range(&self.nav.date_range_title()?, &self.parser)
    }

    fn events(&self, xpath: &str, shown: &DateRange) -> AppResult<Vec<CalendarEvent>> {
        let driver = self.nav.driver();
        stale_retry("calendar events").run(
            retry::on(&[WebDriverErrorKind::StaleElementReference]),
            || {
                driver
                    .find_all(xpath)?
                    .iter()
                    .map(|event| parse_calendar_event(event, shown))
                    .collect()
            },
        )
    }

    pub fn daily_events(&self, shown: &DateRange) -> AppResult<Vec<CalendarEvent>> {
        self.events(DAILY_EVENTS, shown)
    }

    pub fn own_events(&self, shown: &DateRange) -> AppResult<Vec<CalendarEvent>> {
        self.events(OWN_EVENTS, shown)
    }

    /// Run `visit` on every displayed week that overlaps the month, starting
    /// from the week of its first day. Returns the number of weeks visited.
    fn for_each_week_of_month(
        &self,
        year: i32,
        month: u32,
        mut visit: impl FnMut(&DateRange) -> AppResult<()>,
    ) -> AppResult<usize> {
        self.pre(year, month, 1)?;
        for week in 0..=MAX_WEEKS {
            let shown = self.displayed_week()?;
            if !shown.overlaps_month(year, month) {
                return Ok(week);
            }
            debug!(%shown, "visiting week");
            visit(&shown)?;
            self.nav.navigate_calendar(Direction::Next)?;
        }
        Err(AppError::Navigation(format!(
            "{year}-{month:02} spans more than {MAX_WEEKS} weeks"
        )))
    }

    pub fn list_weekly(&self, year: i32, month: u32, day: u32) -> AppResult<CalendarEvents> {
        self.pre(year, month, day)?;
        let shown = self.displayed_week()?;
        Ok(CalendarEvents {
            daily: self.daily_events(&shown)?,
            own: self.own_events(&shown)?,
        })
    }

    /// Events of the month; those reaching outside it are dropped.
    pub fn list_monthly(&self, year: i32, month: u32) -> AppResult<CalendarEvents> {
        let mut events = CalendarEvents::default();
        self.for_each_week_of_month(year, month, |shown| {
            let in_month = |e: &CalendarEvent| e.within_month(year, month);
            events.extend(CalendarEvents {
                daily: self.daily_events(shown)?.into_iter().filter(in_month).collect(),
                own: self.own_events(shown)?.into_iter().filter(in_month).collect(),
            });
            Ok(())
        })?;
        Ok(events)
    }

    fn actions_dropdown(&self) -> AppResult<()> {
        self.nav.annotate("Clicking on actions dropdown");
        self.nav
            .wait()
            .clickable("//button[@aria-label='Actions']")?
            .click()?;
        self.nav.wait().presence(ACTIVE_POPUP)?;
        Ok(())
    }

    fn choose_autofill_action(&self) -> AppResult<()> {
        let option = format!(
            "{ACTIVE_POPUP}//div[@data-automation-label={}]",
            xpath_literal(AUTOFILL_PAGE)
        );
        Retry::constant("auto-fill option", STALE_BUDGET).run(
            retry::on(&[WebDriverErrorKind::ElementNotInteractable]),
            || {
                self.nav.annotate("Selecting Auto-fill from Prior Week");
                self.nav.wait().presence(ACTIVE_POPUP)?;
                let option = self.nav.wait().presence(&option)?;
                option.scroll_into_view()?;
                option.click()
            },
        )
    }

    fn open_prior_week_dropdown(&self) -> AppResult<()> {
        self.nav
            .annotate("Opening dropdown Select Prior Week on popup Auto-fill from Prior Week");
        self.nav.wait().clickable(PRIOR_WEEK_SELECT)?.click()?;
        self.nav.wait().presence(PRIOR_WEEK_LIST)?;
        Ok(())
    }

    fn close_prior_week_dropdown(&self) -> AppResult<()> {
        self.nav
            .annotate("Closing dropdown Select Prior Week on popup Auto-fill from Prior Week");
        self.nav.wait().clickable(PRIOR_WEEK_SELECT)?.click()?;
        self.nav.wait().invisible(PRIOR_WEEK_LIST)
    }

    fn list_prior_weeks(&self) -> AppResult<Vec<String>> {
        self.nav.annotate("Listing prior weeks");
        self.open_prior_week_dropdown()?;
        let driver = self.nav.driver();
        let weeks = stale_retry("prior week options").run(
            retry::on(&[WebDriverErrorKind::StaleElementReference]),
            || {
                let labels = driver
                    .find_all(PRIOR_WEEK_OPTIONS)?
                    .iter()
                    .map(|o| -> AppResult<String> { Ok(o.attribute("aria-label")?.unwrap_or_default()) })
                    .collect::<AppResult<Vec<_>>>()?;
                Ok(prior_week_options(labels))
            },
        )?;
        self.close_prior_week_dropdown()?;
        Ok(weeks)
    }

    fn select_prior_week(&self, label: &str) -> AppResult<()> {
        self.nav
            .annotate(format!("Selecting prior week with label: {label}"));
        self.open_prior_week_dropdown()?;

        let driver = self.nav.driver();
        let found = Retry::constant("prior week option", Duration::from_secs(5)).run(
            retry::on(&[
                WebDriverErrorKind::StaleElementReference,
                WebDriverErrorKind::ElementNotInteractable,
            ]),
            || {
                for option in driver.find_all(PRIOR_WEEK_OPTIONS)? {
                    let aria = option.attribute("aria-label")?.unwrap_or_default();
                    if aria != label {
                        debug!(%aria, label, "not the week we look for");
                        continue;
                    }
                    let table = driver.find(PRIOR_WEEK_TABLE)?;
                    option.click()?;
                    self.nav.wait().staleness(&table)?;
                    self.nav.wait().presence(PRIOR_WEEK_TABLE)?;
                    return Ok(true);
                }
                Ok(false)
            },
        )?;

        if found {
            Ok(())
        } else {
            Err(AppError::Navigation(format!(
                "Prior week option not found: {label}"
            )))
        }
    }

    /// Total of the previewed prior week, `None` when no row matched the header.
    fn prior_week_total(&self) -> AppResult<Option<String>> {
        self.nav.annotate("Reading prior week data table");
        let map = stale_retry("prior week table").run(
            retry::on(&[WebDriverErrorKind::StaleElementReference]),
            || {
                self.nav.wait().invisible(
                    "//div[@data-automation-id='rivaWidget']//td[@data-automation-id='emptyState']",
                )?;
                let table = self.nav.wait().presence(PRIOR_WEEK_TABLE)?;
                let header = table
                    .find_all(".//thead//button/div/span[1]")?
                    .iter()
                    .map(Element::text)
                    .collect::<AppResult<Vec<_>>>()?;
                let rows = table
                    .find_all(".//tbody/tr")?
                    .iter()
                    .map(|row| -> AppResult<Vec<String>> {
                        row.find_all("./td")?.iter().map(Element::text).collect()
                    })
                    .collect::<AppResult<Vec<Vec<String>>>>()?;
                prior_week_table_map(&header, &rows)
            },
        )?;
        Ok(map.and_then(|mut m| m.remove("Total")))
    }

    /// Fill the displayed week from the first prior week with a full total.
    fn autofill_prior_week(&self) -> AppResult<()> {
        self.actions_dropdown()?;
        self.choose_autofill_action()?;

        let mut filled = false;
        for week in self.list_prior_weeks()? {
            self.select_prior_week(&week)?;
            match self.prior_week_total()? {
                Some(total) if is_full_week_total(&total) => {
                    debug!(%week, %total, "using prior week");
                    filled = true;
                    break;
                }
                Some(total) => debug!(%week, %total, "prior week is not full"),
                None => warn!(%week, "prior week table has no readable row"),
            }
        }
        if !filled {
            return Err(AppError::Navigation(
                "Not found prior week with total 40".into(),
            ));
        }

        self.nav.click_ok_button(None)?;
        self.nav.wait_for_page_switch(AUTOFILL_PAGE, ENTER_TIME_PAGE)
    }

    pub fn autofill_week(&self, year: i32, month: u32, day: u32) -> AppResult<()> {
        self.pre(year, month, day)?;
        self.autofill_prior_week()
    }

    /// Fill every week of the month, then report days where a full-day
    /// absence meets a daily time event.
    pub fn autofill_month(&self, year: i32, month: u32) -> AppResult<AutofillReport> {
        let weeks_filled =
            self.for_each_week_of_month(year, month, |_| self.autofill_prior_week())?;

        let absences = AbsenceScanner::new(self.nav, self.language).absences(year, month)?;

        let mut absence_collisions = Vec::new();
        self.for_each_week_of_month(year, month, |shown| {
            for event in self.daily_events(shown)? {
                if !event.within_month(year, month) {
                    continue;
                }
                let day = event.start.date();
                if absences.workday_info(&day)?.worked_hours == 0
                    && !absence_collisions.contains(&day)
                {
                    absence_collisions.push(day);
                }
            }
            Ok(())
        })?;
        absence_collisions.sort();

        Ok(AutofillReport {
            weeks_filled,
            absence_collisions,
        })
    }
}

fn parse_calendar_event(event: &Element<'_>, shown: &DateRange) -> AppResult<CalendarEvent> {
    let attr = |name: &str| -> AppResult<String> {
        event
            .attribute(name)?
            .ok_or_else(|| AppError::Format(format!("calendar event without {name}")))
    };
    let line = |id: &str| -> AppResult<String> {
        event
            .find(&format!(".//div[@data-automation-id='{id}']"))?
            .text()
    };

    // startdate='1-5-9-0' enddate='1-5-13-0'
    CalendarEvent::from_attributes(
        &attr("data-automation-startdate")?,
        &attr("data-automation-enddate")?,
        line("calendarAppointmentTitle")?,
        line("calendarAppointmentSubtitle")?,
        line("calendarAppointmentSubtitle2")?,
        shown,
    )
}
