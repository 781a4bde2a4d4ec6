//! Bounded polling for asynchronous page changes.

use crate::errors::{AppError, AppResult};
use crate::webdriver::client::{Element, WebDriver};
use crate::webdriver::error::WebDriverErrorKind;
use std::thread;
use std::time::{Duration, Instant};
use tracing::trace;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Errors that only mean "not yet" while polling.
fn not_yet(e: &AppError) -> bool {
    matches!(
        e.webdriver_kind(),
        Some(WebDriverErrorKind::NoSuchElement | WebDriverErrorKind::StaleElementReference)
    )
}

/// Call `condition` every `poll` until it yields a value or `timeout` elapses.
pub fn poll_until<T>(
    what: &str,
    timeout: Duration,
    poll: Duration,
    mut condition: impl FnMut() -> AppResult<Option<T>>,
) -> AppResult<T> {
    let deadline = Instant::now() + timeout;
    loop {
        match condition() {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) if not_yet(&e) => trace!(what, error = %e, "still waiting"),
            Err(e) => return Err(e),
        }
        if Instant::now() >= deadline {
            return Err(AppError::Timeout {
                what: what.to_string(),
                seconds: timeout.as_secs(),
            });
        }
        thread::sleep(poll);
    }
}

/// Waits on one session.
#[derive(Clone, Copy)]
pub struct Wait<'d> {
    driver: &'d WebDriver,
    timeout: Duration,
    poll: Duration,
}

impl<'d> Wait<'d> {
    pub fn new(driver: &'d WebDriver) -> Self {
        Self {
            driver,
            timeout: DEFAULT_TIMEOUT,
            poll: POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn until<T>(
        &self,
        what: &str,
        mut condition: impl FnMut(&'d WebDriver) -> AppResult<Option<T>>,
    ) -> AppResult<T> {
        let driver = self.driver;
        poll_until(what, self.timeout, self.poll, || condition(driver))
    }

    pub fn presence(&self, xpath: &str) -> AppResult<Element<'d>> {
        self.until(xpath, |d| d.find(xpath).map(Some))
    }

    pub fn visible(&self, xpath: &str) -> AppResult<Element<'d>> {
        self.until(xpath, |d| {
            let el = d.find(xpath)?;
            Ok(el.is_displayed()?.then_some(el))
        })
    }

    pub fn clickable(&self, xpath: &str) -> AppResult<Element<'d>> {
        self.until(xpath, |d| {
            let el = d.find(xpath)?;
            Ok((el.is_displayed()? && el.is_enabled()?).then_some(el))
        })
    }

    /// Absent, hidden or detached.
    pub fn invisible(&self, xpath: &str) -> AppResult<()> {
        self.until(xpath, |d| match d.find_optional(xpath)? {
            None => Ok(Some(())),
            Some(el) => match el.is_displayed() {
                Ok(shown) => Ok((!shown).then_some(())),
                Err(e) if not_yet(&e) => Ok(Some(())),
                Err(e) => Err(e),
            },
        })
    }

    /// Until the element at `xpath` carries `name` with a value other than `before`.
    pub fn attribute_changed(&self, xpath: &str, name: &str, before: &str) -> AppResult<String> {
        self.until(xpath, |d| {
            let value = d.find(xpath)?.attribute(name)?;
            Ok(value.filter(|v| v != before))
        })
    }

    pub fn staleness(&self, element: &Element<'d>) -> AppResult<()> {
        poll_until("element to go stale", self.timeout, self.poll, || {
            Ok(element.is_stale()?.then_some(()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webdriver::error::WebDriverError;

    const TICK: Duration = Duration::from_millis(1);

    #[test]
    fn returns_once_condition_holds() {
        let mut calls = 0;
        let v = poll_until("counter", Duration::from_secs(1), TICK, || {
            calls += 1;
            Ok((calls == 3).then_some(calls))
        })
        .unwrap();
        assert_eq!(v, 3);
    }

    #[test]
    fn missing_element_means_not_yet() {
        let mut calls = 0;
        let v = poll_until("element", Duration::from_secs(1), TICK, || {
            calls += 1;
            if calls < 3 {
                Err(WebDriverError::new(WebDriverErrorKind::NoSuchElement, "nope").into())
            } else {
                Ok(Some("found"))
            }
        })
        .unwrap();
        assert_eq!(v, "found");
    }

    #[test]
    fn other_errors_propagate() {
        let r: AppResult<()> = poll_until("element", Duration::from_secs(1), TICK, || {
            Err(WebDriverError::new(WebDriverErrorKind::InvalidSessionId, "gone").into())
        });
        assert!(matches!(r, Err(AppError::WebDriver(_))));
    }

    #[test]
    fn times_out() {
        let r: AppResult<()> = poll_until("never", Duration::from_millis(5), TICK, || Ok(None));
        assert!(matches!(r, Err(AppError::Timeout { .. })));
    }
}
