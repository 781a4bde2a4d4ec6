pub mod absence;
pub mod config;
pub mod time;

use crate::cli::parser::Cli;
use crate::config::{Config, ConfigFile};
use crate::errors::AppResult;
use crate::ui::annotate::Annotator;
use crate::utils::date::Language;
use crate::webdriver::capabilities::FirefoxOptions;
use crate::workday::{BrowserOptions, BrowserSession, Navigator};
use tracing::warn;

/// Browser settings from the configuration file and command-line flags.
pub fn browser_options(cli: &Cli, cfg: &Config) -> BrowserOptions {
    let firefox = &cfg.browser_configuration.firefox;
    let defaults = BrowserOptions::default();
    BrowserOptions {
        firefox: FirefoxOptions {
            headless: cli.dev.headless(),
            dev_console: cli.dev.browser_dev_console,
            profile_path: cli.dev.browser_profile_path.clone(),
            preferences: firefox.preferences.clone(),
            ..defaults.firefox
        },
        driver_path: firefox.driver_path.clone().unwrap_or(defaults.driver_path),
        webdriver_url: firefox.webdriver_url.clone(),
        close_on_finish: !cli.dev.no_browser_close_on_finish,
    }
}

/// Start a browser, run `work` against the portal and close the browser
/// again whatever the outcome.
pub fn with_portal<T>(
    cli: &Cli,
    file: &ConfigFile,
    work: impl FnOnce(&Navigator<'_>, Language) -> AppResult<T>,
) -> AppResult<T> {
    let cfg = file.config()?;
    let home_url = cfg.home_url()?.to_string();
    let language = cfg.language()?;

    let session = BrowserSession::start(&browser_options(cli, &cfg))?;
    let outcome = {
        let nav = Navigator::new(
            session.driver(),
            home_url,
            Annotator::new(cli.dev.annotate_actions),
        );
        work(&nav, language)
    };
    let closed = session.finish();

    match (outcome, closed) {
        (Ok(value), closed) => closed.map(|_| value),
        (Err(e), Err(close_err)) => {
            warn!(error = %close_err, "failed to close the browser");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
    }
}
