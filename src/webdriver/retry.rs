//! Bounded retries around transient UI failures.

use crate::errors::{AppError, AppResult};
use crate::webdriver::error::WebDriverErrorKind;
use std::thread;
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `base`, `2 * base`, `4 * base`, ... for at most `max_tries` attempts.
    Exponential { max_tries: u32, base: Duration },
    /// Fixed `interval` while the next attempt still fits in `max_time`.
    Constant { interval: Duration, max_time: Duration },
}

/// Retry policy for one operation.
#[derive(Debug, Clone)]
pub struct Retry {
    what: String,
    backoff: Backoff,
}

/// Retry on any of the given WebDriver error kinds.
pub fn on(kinds: &[WebDriverErrorKind]) -> impl Fn(&AppError) -> bool + '_ {
    move |e| e.webdriver_kind().is_some_and(|k| kinds.contains(k))
}

impl Retry {
    pub fn exponential(what: impl Into<String>, max_tries: u32) -> Self {
        Self {
            what: what.into(),
            backoff: Backoff::Exponential {
                max_tries,
                base: Duration::from_secs(1),
            },
        }
    }

    pub fn constant(what: impl Into<String>, max_time: Duration) -> Self {
        Self {
            what: what.into(),
            backoff: Backoff::Constant {
                interval: Duration::from_secs(1),
                max_time,
            },
        }
    }

    /// Replace the base delay (exponential) or interval (constant).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.backoff = match self.backoff {
            Backoff::Exponential { max_tries, .. } => Backoff::Exponential {
                max_tries,
                base: delay,
            },
            Backoff::Constant { max_time, .. } => Backoff::Constant {
                interval: delay,
                max_time,
            },
        };
        self
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Delay before attempt `attempt + 1`, or `None` when the budget is spent.
    fn next_delay(&self, attempt: u32, started: Instant) -> Option<Duration> {
        match self.backoff {
            Backoff::Exponential { max_tries, base } => {
                (attempt < max_tries).then(|| base * 2u32.saturating_pow(attempt - 1))
            }
            Backoff::Constant { interval, max_time } => {
                (started.elapsed() + interval <= max_time).then_some(interval)
            }
        }
    }

    pub fn run<T>(
        &self,
        retryable: impl Fn(&AppError) -> bool,
        op: impl FnMut() -> AppResult<T>,
    ) -> AppResult<T> {
        self.run_with(retryable, || Ok(()), op)
    }

    /// Like [`run`](Self::run), calling `between` before every new attempt.
    pub fn run_with<T>(
        &self,
        retryable: impl Fn(&AppError) -> bool,
        mut between: impl FnMut() -> AppResult<()>,
        mut op: impl FnMut() -> AppResult<T>,
    ) -> AppResult<T> {
        let started = Instant::now();
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if retryable(&e) => match self.next_delay(attempt, started) {
                    Some(delay) => {
                        warn!(
                            what = %self.what,
                            attempt,
                            error = %e,
                            "backing off {:.1}s",
                            delay.as_secs_f32()
                        );
                        between()?;
                        thread::sleep(delay);
                    }
                    None => return Err(e),
                },
                Err(e) => return Err(e),
            }
        }
    }

    /// Repeat `op` while it yields `None`; the last `None` is returned when
    /// the budget is spent.
    pub fn until_some<T>(&self, mut op: impl FnMut() -> AppResult<Option<T>>) -> AppResult<Option<T>> {
        let started = Instant::now();
        let mut attempt = 0;
        loop {
            attempt += 1;
            if let Some(value) = op()? {
                return Ok(Some(value));
            }
            match self.next_delay(attempt, started) {
                Some(delay) => {
                    warn!(what = %self.what, attempt, "no result yet, backing off");
                    thread::sleep(delay);
                }
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webdriver::error::WebDriverError;

    fn intercepted() -> AppError {
        WebDriverError::new(WebDriverErrorKind::ElementClickIntercepted, "overlay").into()
    }

    #[test]
    fn exponential_stops_after_max_tries() {
        let retry = Retry::exponential("click", 3).with_delay(Duration::from_millis(1));
        let mut calls = 0;
        let r: AppResult<()> = retry.run(on(&[WebDriverErrorKind::ElementClickIntercepted]), || {
            calls += 1;
            Err(intercepted())
        });
        assert!(r.unwrap_err().is_transient());
        assert_eq!(calls, 3);
    }

    #[test]
    fn between_runs_before_each_new_attempt() {
        let retry = Retry::exponential("menu", 2).with_delay(Duration::from_millis(1));
        let mut homes = 0;
        let mut calls = 0;
        let r = retry.run_with(
            on(&[WebDriverErrorKind::ElementClickIntercepted]),
            || {
                homes += 1;
                Ok(())
            },
            || {
                calls += 1;
                if calls == 1 { Err(intercepted()) } else { Ok(calls) }
            },
        );
        assert_eq!(r.unwrap(), 2);
        assert_eq!(homes, 1);
    }

    #[test]
    fn non_retryable_error_is_immediate() {
        let retry = Retry::exponential("click", 3).with_delay(Duration::from_millis(1));
        let mut calls = 0;
        let r: AppResult<()> = retry.run(on(&[WebDriverErrorKind::StaleElementReference]), || {
            calls += 1;
            Err(intercepted())
        });
        assert!(r.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn constant_budget_gives_up_with_none() {
        let retry = Retry::constant("row", Duration::from_millis(20)).with_delay(Duration::from_millis(5));
        let mut calls = 0;
        let r: Option<u32> = retry
            .until_some(|| {
                calls += 1;
                Ok(None)
            })
            .unwrap();
        assert!(r.is_none());
        assert!(calls >= 2);
    }

    #[test]
    fn exponential_delays_double() {
        let retry = Retry::exponential("x", 4);
        let now = Instant::now();
        assert_eq!(retry.next_delay(1, now), Some(Duration::from_secs(1)));
        assert_eq!(retry.next_delay(2, now), Some(Duration::from_secs(2)));
        assert_eq!(retry.next_delay(3, now), Some(Duration::from_secs(4)));
        assert_eq!(retry.next_delay(4, now), None);
    }
}
