//! The local geckodriver process.

use crate::errors::{AppError, AppResult};
use crate::webdriver::wait::poll_until;
use reqwest::blocking::Client;
use serde_json::Value;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);
const STARTUP_POLL: Duration = Duration::from_millis(100);

/// A spawned geckodriver, killed on drop unless detached.
pub struct GeckoDriver {
    child: Option<Child>,
    url: Url,
}

fn free_local_port() -> AppResult<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// `GET /status` reports `ready: true`.
fn is_ready(http: &Client, url: &Url) -> AppResult<bool> {
    let response = match http.get(url.join("status")?).send() {
        Ok(r) => r,
        Err(e) if e.is_connect() => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    let payload: Value = response.json()?;
    Ok(payload["value"]["ready"].as_bool().unwrap_or(false))
}

impl GeckoDriver {
    /// Spawn `program` (usually `geckodriver` from `PATH`) on a free port and
    /// wait until it accepts sessions.
    pub fn spawn(program: &str) -> AppResult<Self> {
        let port = free_local_port()?;
        let url = Url::parse(&format!("http://127.0.0.1:{port}/"))?;

        debug!(program, port, "starting geckodriver");
        let child = Command::new(program)
            .args(["--port", &port.to_string()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AppError::Other(format!("failed to start {program}: {e}")))?;
        let driver = Self {
            child: Some(child),
            url,
        };

        let http = Client::builder().timeout(STARTUP_POLL * 10).build()?;
        poll_until("geckodriver to start", STARTUP_TIMEOUT, STARTUP_POLL, || {
            Ok(is_ready(&http, &driver.url)?.then_some(()))
        })?;
        Ok(driver)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Leave the process (and its browser) running after we exit.
    pub fn detach(mut self) {
        self.child.take();
    }
}

impl Drop for GeckoDriver {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                warn!(error = %e, "failed to stop geckodriver");
            }
            let _ = child.wait();
        }
    }
}
