use crate::errors::{AppError, AppResult};
use crate::webdriver::capabilities::FirefoxOptions;
use crate::webdriver::driver::GeckoDriver;
use crate::webdriver::{WebDriver, WebDriverErrorKind};
use tracing::{debug, info, warn};
use url::Url;

/// How to get a browser.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub firefox: FirefoxOptions,
    /// geckodriver executable to spawn.
    pub driver_path: String,
    /// Existing WebDriver server; nothing is spawned when set.
    pub webdriver_url: Option<String>,
    pub close_on_finish: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            firefox: FirefoxOptions {
                headless: true,
                log_level: Some("trace".to_string()),
                ..FirefoxOptions::default()
            },
            driver_path: "geckodriver".to_string(),
            webdriver_url: None,
            close_on_finish: true,
        }
    }
}

/// One Firefox session, with the geckodriver process behind it if we started it.
pub struct BrowserSession {
    driver: WebDriver,
    gecko: Option<GeckoDriver>,
    close_on_finish: bool,
}

fn session_gone(e: &AppError) -> bool {
    e.webdriver_kind().is_some_and(WebDriverErrorKind::is_session_gone)
}

impl BrowserSession {
    pub fn start(options: &BrowserOptions) -> AppResult<Self> {
        let (gecko, server) = match &options.webdriver_url {
            Some(url) => {
                debug!(%url, "attaching to webdriver server");
                (None, Url::parse(url)?)
            }
            None => {
                let gecko = GeckoDriver::spawn(&options.driver_path)?;
                let url = gecko.url().clone();
                (Some(gecko), url)
            }
        };

        let driver = WebDriver::new_session(&server, options.firefox.to_capabilities())
            .inspect_err(|e| {
                if e.webdriver_kind().is_some() {
                    warn!("Maybe there is still some gecko process from other/concurrent run?");
                }
            })?;
        info!(session = driver.session_id(), "browser started");

        Ok(Self {
            driver,
            gecko,
            close_on_finish: options.close_on_finish,
        })
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// Close the browser, or leave it open for inspection when closing was
    /// disabled. A window or session that is already gone is not an error.
    pub fn finish(mut self) -> AppResult<()> {
        if !self.close_on_finish {
            if let Some(gecko) = self.gecko.take() {
                gecko.detach();
            }
            info!("leaving the browser open");
            return Ok(());
        }

        for result in [self.driver.close_window(), self.driver.quit()] {
            match result {
                Err(e) if session_gone(&e) => debug!(error = %e, "browser already closed"),
                other => other?,
            }
        }
        Ok(())
    }
}
