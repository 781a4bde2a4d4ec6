//! WebDriver HTTP client.

use crate::errors::{AppError, AppResult};
use crate::webdriver::error::{WebDriverError, WebDriverErrorKind};
use reqwest::Method;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Key of a web element reference in W3C payloads.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// One browser session on a WebDriver server.
///
/// Commands are blocking and must not be issued concurrently.
pub struct WebDriver {
    http: Client,
    server: Url,
    session_url: Url,
    session_id: String,
}

/// A reference to a DOM element of the session that found it.
#[derive(Clone)]
pub struct Element<'d> {
    driver: &'d WebDriver,
    id: String,
}

fn send(http: &Client, method: Method, url: Url, body: Option<Value>) -> AppResult<Value> {
    trace!(%method, %url, ?body, "webdriver command");
    let mut request = http.request(method.clone(), url);
    if method == Method::POST {
        request = request.json(&body.unwrap_or_else(|| json!({})));
    }

    let response = request.send()?;
    let status = response.status();
    let mut payload: Value = response.json()?;
    let value = payload
        .get_mut("value")
        .map(Value::take)
        .unwrap_or(Value::Null);

    if !status.is_success() || value.get("error").is_some() {
        return Err(WebDriverError::from_value(&value).into());
    }
    Ok(value)
}

fn element_id(value: &Value) -> AppResult<String> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::Other(format!("not an element reference: {value}")))
}

fn optional_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl WebDriver {
    /// Open a new session on `server` (e.g. `http://127.0.0.1:4444`).
    pub fn new_session(server: &Url, capabilities: Value) -> AppResult<Self> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let value = send(
            &http,
            Method::POST,
            server.join("session")?,
            Some(json!({ "capabilities": { "alwaysMatch": capabilities } })),
        )?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                WebDriverError::new(WebDriverErrorKind::SessionNotCreated, "missing sessionId")
            })?
            .to_string();
        let session_url = server.join(&format!("session/{session_id}/"))?;
        debug!(%session_id, "webdriver session created");

        Ok(Self {
            http,
            server: server.clone(),
            session_url,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn command(&self, method: Method, path: &str, body: Option<Value>) -> AppResult<Value> {
        send(&self.http, method, self.session_url.join(path)?, body)
    }

    pub fn goto(&self, url: &str) -> AppResult<()> {
        self.command(Method::POST, "url", Some(json!({ "url": url })))?;
        Ok(())
    }

    pub fn current_url(&self) -> AppResult<String> {
        let value = self.command(Method::GET, "url", None)?;
        Ok(optional_string(value).unwrap_or_default())
    }

    pub fn title(&self) -> AppResult<String> {
        let value = self.command(Method::GET, "title", None)?;
        Ok(optional_string(value).unwrap_or_default())
    }

    pub fn find(&self, xpath: &str) -> AppResult<Element<'_>> {
        let value = self.command(Method::POST, "element", Some(xpath_query(xpath)))?;
        Ok(Element {
            driver: self,
            id: element_id(&value)?,
        })
    }

    /// Like [`find`](Self::find) but a missing element is `Ok(None)`.
    pub fn find_optional(&self, xpath: &str) -> AppResult<Option<Element<'_>>> {
        not_found_as_none(self.find(xpath))
    }

    pub fn find_all(&self, xpath: &str) -> AppResult<Vec<Element<'_>>> {
        let value = self.command(Method::POST, "elements", Some(xpath_query(xpath)))?;
        self.elements(value)
    }

    fn elements(&self, value: Value) -> AppResult<Vec<Element<'_>>> {
        value
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|v| {
                Ok(Element {
                    driver: self,
                    id: element_id(v)?,
                })
            })
            .collect()
    }

    pub fn execute(&self, script: &str, args: Vec<Value>) -> AppResult<Value> {
        self.command(
            Method::POST,
            "execute/sync",
            Some(json!({ "script": script, "args": args })),
        )
    }

    pub fn close_window(&self) -> AppResult<()> {
        self.command(Method::DELETE, "window", None)?;
        Ok(())
    }

    /// End the session; the browser exits.
    pub fn quit(&self) -> AppResult<()> {
        let url = self.server.join(&format!("session/{}", self.session_id))?;
        send(&self.http, Method::DELETE, url, None)?;
        Ok(())
    }
}

fn xpath_query(xpath: &str) -> Value {
    json!({ "using": "xpath", "value": xpath })
}

fn not_found_as_none<T>(result: AppResult<T>) -> AppResult<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.webdriver_kind() == Some(&WebDriverErrorKind::NoSuchElement) => Ok(None),
        Err(e) => Err(e),
    }
}

impl<'d> Element<'d> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn driver(&self) -> &'d WebDriver {
        self.driver
    }

    fn command(&self, method: Method, path: &str, body: Option<Value>) -> AppResult<Value> {
        self.driver
            .command(method, &format!("element/{}/{path}", self.id), body)
    }

    fn as_arg(&self) -> Value {
        json!({ ELEMENT_KEY: self.id })
    }

    pub fn find(&self, xpath: &str) -> AppResult<Element<'d>> {
        let value = self.command(Method::POST, "element", Some(xpath_query(xpath)))?;
        Ok(Element {
            driver: self.driver,
            id: element_id(&value)?,
        })
    }

    pub fn find_optional(&self, xpath: &str) -> AppResult<Option<Element<'d>>> {
        not_found_as_none(self.find(xpath))
    }

    pub fn find_all(&self, xpath: &str) -> AppResult<Vec<Element<'d>>> {
        let value = self.command(Method::POST, "elements", Some(xpath_query(xpath)))?;
        self.driver.elements(value)
    }

    pub fn click(&self) -> AppResult<()> {
        self.command(Method::POST, "click", None)?;
        Ok(())
    }

    pub fn text(&self) -> AppResult<String> {
        let value = self.command(Method::GET, "text", None)?;
        Ok(optional_string(value).unwrap_or_default())
    }

    pub fn attribute(&self, name: &str) -> AppResult<Option<String>> {
        let value = self.command(Method::GET, &format!("attribute/{name}"), None)?;
        Ok(optional_string(value))
    }

    /// Live DOM property, e.g. the current `value` of an input.
    pub fn property(&self, name: &str) -> AppResult<Option<String>> {
        let value = self.command(Method::GET, &format!("property/{name}"), None)?;
        Ok(optional_string(value))
    }

    pub fn send_keys(&self, text: &str) -> AppResult<()> {
        self.command(Method::POST, "value", Some(json!({ "text": text })))?;
        Ok(())
    }

    pub fn is_displayed(&self) -> AppResult<bool> {
        let value = self.command(Method::GET, "displayed", None)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub fn is_enabled(&self) -> AppResult<bool> {
        let value = self.command(Method::GET, "enabled", None)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub fn scroll_into_view(&self) -> AppResult<()> {
        self.driver.execute(
            "arguments[0].scrollIntoView({block: 'center'});",
            vec![self.as_arg()],
        )?;
        Ok(())
    }

    /// Move the pointer onto the element and click it there.
    pub fn move_and_click(&self) -> AppResult<()> {
        let actions = json!({
            "actions": [{
                "type": "pointer",
                "id": "mouse",
                "parameters": { "pointerType": "mouse" },
                "actions": [
                    { "type": "pointerMove", "duration": 0, "origin": self.as_arg(), "x": 0, "y": 0 },
                    { "type": "pointerDown", "button": 0 },
                    { "type": "pointerUp", "button": 0 }
                ]
            }]
        });
        self.driver.command(Method::POST, "actions", Some(actions))?;
        self.driver.command(Method::DELETE, "actions", None)?;
        Ok(())
    }

    /// True once the element is detached from the document.
    pub fn is_stale(&self) -> AppResult<bool> {
        match self.is_enabled() {
            Ok(_) => Ok(false),
            Err(e) if e.webdriver_kind() == Some(&WebDriverErrorKind::StaleElementReference) => {
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}
