//! WebDriver error types.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Error codes of the W3C WebDriver protocol that callers act upon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebDriverErrorKind {
    NoSuchElement,
    StaleElementReference,
    ElementClickIntercepted,
    ElementNotInteractable,
    Timeout,
    InvalidSessionId,
    NoSuchWindow,
    SessionNotCreated,
    Other(String),
}

impl WebDriverErrorKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "no such element" => WebDriverErrorKind::NoSuchElement,
            "stale element reference" => WebDriverErrorKind::StaleElementReference,
            "element click intercepted" => WebDriverErrorKind::ElementClickIntercepted,
            "element not interactable" => WebDriverErrorKind::ElementNotInteractable,
            "timeout" | "script timeout" => WebDriverErrorKind::Timeout,
            "invalid session id" => WebDriverErrorKind::InvalidSessionId,
            "no such window" => WebDriverErrorKind::NoSuchWindow,
            "session not created" => WebDriverErrorKind::SessionNotCreated,
            other => WebDriverErrorKind::Other(other.to_string()),
        }
    }

    /// UI states that usually clear up on their own.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WebDriverErrorKind::StaleElementReference
                | WebDriverErrorKind::ElementClickIntercepted
                | WebDriverErrorKind::ElementNotInteractable
        )
    }

    /// The browser window or session is already gone.
    pub fn is_session_gone(&self) -> bool {
        matches!(
            self,
            WebDriverErrorKind::InvalidSessionId | WebDriverErrorKind::NoSuchWindow
        )
    }
}

impl fmt::Display for WebDriverErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            WebDriverErrorKind::NoSuchElement => "no such element",
            WebDriverErrorKind::StaleElementReference => "stale element reference",
            WebDriverErrorKind::ElementClickIntercepted => "element click intercepted",
            WebDriverErrorKind::ElementNotInteractable => "element not interactable",
            WebDriverErrorKind::Timeout => "timeout",
            WebDriverErrorKind::InvalidSessionId => "invalid session id",
            WebDriverErrorKind::NoSuchWindow => "no such window",
            WebDriverErrorKind::SessionNotCreated => "session not created",
            WebDriverErrorKind::Other(code) => code,
        };
        f.write_str(code)
    }
}

/// Error reported by the remote end.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct WebDriverError {
    pub kind: WebDriverErrorKind,
    pub message: String,
}

impl WebDriverError {
    pub fn new(kind: WebDriverErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build from the `value` object of an error response:
    /// `{"error": "no such element", "message": "...", "stacktrace": "..."}`.
    pub fn from_value(value: &Value) -> Self {
        let code = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Self::new(WebDriverErrorKind::from_code(code), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_error_payload() {
        let err = WebDriverError::from_value(&json!({
            "error": "element click intercepted",
            "message": "Element <button> is not clickable at point (10,10)",
            "stacktrace": ""
        }));
        assert_eq!(err.kind, WebDriverErrorKind::ElementClickIntercepted);
        assert!(err.kind.is_transient());
        assert!(err.to_string().starts_with("element click intercepted:"));
    }

    #[test]
    fn unknown_code_is_kept() {
        let err = WebDriverError::from_value(&json!({"error": "unexpected alert open"}));
        assert_eq!(
            err.kind,
            WebDriverErrorKind::Other("unexpected alert open".into())
        );
        assert!(!err.kind.is_transient());
    }

    #[test]
    fn session_gone_kinds() {
        assert!(WebDriverErrorKind::NoSuchWindow.is_session_gone());
        assert!(WebDriverErrorKind::InvalidSessionId.is_session_gone());
        assert!(!WebDriverErrorKind::NoSuchElement.is_session_gone());
    }
}
