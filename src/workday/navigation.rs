use crate::errors::{AppError, AppResult};
use crate::ui::annotate::Annotator;
use crate::webdriver::retry::{self, Retry};
use crate::webdriver::{Element, WebDriver, WebDriverErrorKind, Wait, xpath_literal};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const WD_DOMAIN: &str = "myworkday.com";

/// Budget for the (slow, SSO-redirecting) first load of the home page.
const HOME_TIMEOUT: Duration = Duration::from_secs(60);

const DATE_RANGE_TITLE: &str = "//h2[@data-automation-id='dateRangeTitle']";
const VISIBLE_RANGE_ATTR: &str = "data-automation-visiblerangestartdate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Next => "next",
            Direction::Prev => "prev",
        })
    }
}

/// Host of `url` belongs to Workday.
pub fn is_workday_host(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.ends_with(WD_DOMAIN)))
        .unwrap_or(false)
}

/// Navigation shared by every Workday page object.
pub struct Navigator<'d> {
    driver: &'d WebDriver,
    home_url: String,
    annotator: Annotator,
}

impl<'d> Navigator<'d> {
    pub fn new(driver: &'d WebDriver, home_url: impl Into<String>, annotator: Annotator) -> Self {
        Self {
            driver,
            home_url: home_url.into(),
            annotator,
        }
    }

    pub fn driver(&self) -> &'d WebDriver {
        self.driver
    }

    pub fn wait(&self) -> Wait<'d> {
        Wait::new(self.driver)
    }

    pub fn annotate<T: fmt::Display>(&self, msg: T) {
        self.annotator.annotate(msg);
    }

    pub fn navigate_home(&self) -> AppResult<()> {
        debug!(url = %self.home_url, "navigating home");
        self.driver.goto(&self.home_url)
    }

    /// Load the home page once if we are not on Workday yet, then require
    /// a Workday host.
    pub fn ensure_on_workday_url(&self) -> AppResult<()> {
        self.annotate("Ensure we are on the Workday URL");
        let current = self.driver.current_url()?;
        debug!(%current, "current URL");
        if is_workday_host(&current) {
            return Ok(());
        }

        self.navigate_home()?;
        self.wait()
            .with_timeout(HOME_TIMEOUT)
            .until(WD_DOMAIN, |d| Ok(is_workday_host(&d.current_url()?).then_some(())))
            .map_err(|e| match e {
                AppError::Timeout { .. } => {
                    AppError::Navigation(format!("Failed to navigate to {WD_DOMAIN}"))
                }
                other => other,
            })
    }

    /// Click "reset" on the session expiration modal if it is shown.
    pub fn dismiss_session_expiration(&self) -> AppResult<()> {
        let Some(modal) = self
            .driver
            .find_optional("//div[@data-automation-id='sessionWarningModal']")?
        else {
            return Ok(());
        };
        self.annotate("Dismissing session expiration warning");
        modal
            .find(".//button[@data-automation-id='uic_resetButton']")
            .and_then(|b| b.click())
            .map_err(|e| {
                AppError::Navigation(format!(
                    "Page has session warning modal but I failed to click on a reset the session: {e}"
                ))
            })
    }

    /// Open a module (`Absence`, `Time`) from the global navigation menu.
    pub fn hamburger_menu(&self, aria_label: &str) -> AppResult<()> {
        let module = format!("//a[@aria-label={}]", xpath_literal(aria_label));
        Retry::exponential("global navigation", 2).run_with(
            retry::on(&[WebDriverErrorKind::ElementClickIntercepted]),
            || self.navigate_home(),
            || {
                self.annotate("Clicking on icon of hamburger menu to open the Global Navigation");
                self.wait()
                    .clickable("//button[@title='Global Navigation']")?
                    .click()?;
                self.annotate(format!("Clicking on module: {aria_label}"));
                self.wait().clickable(&module)?.click()
            },
        )
    }

    /// Move the displayed calendar one page and wait until it has redrawn.
    pub fn navigate_calendar(&self, direction: Direction) -> AppResult<()> {
        self.annotate(format!("Navigating calendar in direction: {direction}"));
        let calendar_xpath = format!("//div[@{VISIBLE_RANGE_ATTR}]");
        let calendar = self.driver.find(&calendar_xpath)?;
        let before = calendar.attribute(VISIBLE_RANGE_ATTR)?.unwrap_or_default();

        let button = format!("//button[@data-automation-id='{direction}MonthButton']");
        Retry::exponential("calendar navigation", 2)
            .run(retry::on(&[WebDriverErrorKind::ElementClickIntercepted]), || {
                let button = self.driver.find(&button)?;
                button.scroll_into_view()?;
                button.click()
            })
            .inspect_err(|e| {
                warn!(error = %e, "Failed to change month towards {direction} after retries.")
            })?;

        self.wait().attribute_changed(&calendar_xpath, VISIBLE_RANGE_ATTR, &before)?;
        Ok(())
    }

    /// Text of the calendar header, e.g. `January 2024` or `29 Jan – 4 Feb 2024`.
    pub fn date_range_title(&self) -> AppResult<String> {
        self.wait().visible(DATE_RANGE_TITLE)?.text()
    }

    pub fn click_ok_button(&self, parent: Option<&Element<'d>>) -> AppResult<()> {
        const OK: &str = ".//button[@data-automation-id='wd-CommandButton_uic_okButton']";
        match parent {
            Some(p) => p.find(OK)?.click(),
            None => self.driver.find(OK)?.click(),
        }
    }

    /// Wait for the page titled `old_title` to be replaced by `new_title`.
    pub fn wait_for_page_switch(&self, old_title: &str, new_title: &str) -> AppResult<()> {
        let title = |t: &str| {
            format!(
                "//div[@data-automation-id='viewStackHeaderTitle']//span[@data-automation-id='pageHeaderTitleText'][@title={}]",
                xpath_literal(t)
            )
        };
        let old = self.driver.find(&title(old_title))?;
        self.wait().staleness(&old)?;
        self.wait().presence(&title(new_title))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workday_hosts() {
        assert!(is_workday_host("https://wd3.myworkday.com/acme/d/home.htmld"));
        assert!(!is_workday_host("https://login.microsoftonline.com/"));
        assert!(!is_workday_host("about:blank"));
        assert!(!is_workday_host(""));
    }

    #[test]
    fn direction_names_match_button_ids() {
        assert_eq!(Direction::Next.to_string(), "next");
        assert_eq!(Direction::Prev.to_string(), "prev");
    }
}
