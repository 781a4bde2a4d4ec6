//! Unified application error type.
//! All modules (core, webdriver, workday, cli) return AppError to keep the
//! error handling consistent and easy to manage.

use crate::models::absence::AbsenceAttributes;
use crate::webdriver::error::WebDriverError;
use chrono::NaiveDate;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Browser
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] WebDriverError),

    #[error("Timed out after {seconds}s waiting for {what}")]
    Timeout { what: String, seconds: u64 },

    #[error("Navigation error: {0}")]
    Navigation(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Unknown format: {0}")]
    Format(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid hours: {0}")]
    InvalidHours(String),

    // ---------------------------
    // Ledger errors
    // ---------------------------
    #[error("Conflicting entry on {date}. Existing: {existing}, New: {new}")]
    Conflict {
        date: NaiveDate,
        existing: AbsenceAttributes,
        new: AbsenceAttributes,
    },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("configuration is missing `home_url`.")]
    MissingHomeUrl,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True when the error came from the browser reporting a transient UI
    /// state (stale element, intercepted click, element not interactable).
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::WebDriver(e) if e.kind.is_transient())
    }

    /// The WebDriver error kind, if this error came from the browser.
    pub fn webdriver_kind(&self) -> Option<&crate::webdriver::error::WebDriverErrorKind> {
        match self {
            AppError::WebDriver(e) => Some(&e.kind),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
