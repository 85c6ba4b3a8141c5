/*!
 * W3C WebDriver client for geckodriver.
 *
 * The launcher spawns geckodriver on a free local port, waits for its status
 * endpoint to report ready and opens a Firefox session. All commands are
 * plain JSON over HTTP, sent with reqwest.
 */

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method};
use serde_json::{Value, json};
use std::fs::File;
use std::net::TcpListener;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};

use super::{DriverLauncher, ElementRef, LaunchOptions, RemoteDriver};
use crate::errors::DriverError;

/// Key under which WebDriver returns element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Interval between driver status checks during startup
const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Per-request timeout for driver commands
const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Launches Firefox sessions through geckodriver
#[derive(Debug, Default, Clone)]
pub struct GeckoLauncher;

impl GeckoLauncher {
    pub fn new() -> Self {
        Self
    }

    fn free_port() -> Result<u16, DriverError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|e| DriverError::Launch(format!("No free local port: {}", e)))?;
        let port = listener
            .local_addr()
            .map_err(|e| DriverError::Launch(format!("No free local port: {}", e)))?
            .port();
        Ok(port)
    }

    fn log_output(path: Option<&Path>) -> Result<(Stdio, Stdio), DriverError> {
        match path {
            Some(path) => {
                let file = File::create(path).map_err(|e| {
                    DriverError::Launch(format!("Cannot create driver log {}: {}", path.display(), e))
                })?;
                let stderr = file.try_clone().map_err(|e| DriverError::Launch(e.to_string()))?;
                Ok((Stdio::from(file), Stdio::from(stderr)))
            }
            None => Ok((Stdio::null(), Stdio::null())),
        }
    }

    /// Build the new-session capabilities for Firefox
    pub fn capabilities(options: &LaunchOptions) -> Value {
        let mut args = Vec::new();
        if options.headless {
            args.push("-headless");
        }

        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "firefox",
                    "moz:firefoxOptions": {
                        "binary": options.browser_binary.to_string_lossy(),
                        "args": args,
                    }
                }
            }
        })
    }

    /// Poll the driver's status endpoint until it reports ready
    ///
    /// Fails early when the driver process exits before becoming ready.
    async fn wait_until_ready(
        client: &Client,
        base_url: &str,
        child: &mut Child,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let deadline = Instant::now().checked_add(timeout);
        let url = format!("{}/status", base_url);

        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return Err(DriverError::Launch(format!("Driver exited during startup ({})", status)));
                }
                Ok(None) => {}
                Err(e) => return Err(DriverError::Launch(format!("Cannot check driver process: {}", e))),
            }

            if let Ok(response) = client.get(&url).send().await {
                if let Ok(status) = response.json::<Value>().await {
                    if status["value"]["ready"].as_bool().unwrap_or(false) {
                        return Ok(());
                    }
                }
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(DriverError::Launch(format!(
                    "Driver at {} not ready after {:?}",
                    base_url, timeout
                )));
            }
            tokio::time::sleep(STATUS_POLL_INTERVAL).await;
        }
    }

    async fn new_session(client: &Client, base_url: &str, options: &LaunchOptions) -> Result<String, DriverError> {
        let response = client
            .post(format!("{}/session", base_url))
            .json(&Self::capabilities(options))
            .send()
            .await
            .map_err(|e| DriverError::Request(e.to_string()))?;

        let value = unwrap_response(response).await?;
        value["sessionId"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DriverError::Request("New session reply has no sessionId".to_string()))
    }
}

#[async_trait]
impl DriverLauncher for GeckoLauncher {
    type Driver = WebDriverSession;

    async fn launch(&self, options: &LaunchOptions) -> Result<WebDriverSession, DriverError> {
        if !options.driver_binary.is_file() {
            return Err(DriverError::Launch(format!(
                "Driver binary not found: {}",
                options.driver_binary.display()
            )));
        }
        if !options.browser_binary.is_file() {
            return Err(DriverError::Launch(format!(
                "Browser binary not found: {}",
                options.browser_binary.display()
            )));
        }

        let port = Self::free_port()?;
        let (stdout, stderr) = Self::log_output(options.driver_log.as_deref())?;

        let mut child = Command::new(&options.driver_binary)
            .arg("--port")
            .arg(port.to_string())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DriverError::Launch(format!("Cannot start {}: {}", options.driver_binary.display(), e))
            })?;

        let base_url = format!("http://127.0.0.1:{}", port);
        let client = Client::builder()
            .timeout(COMMAND_TIMEOUT)
            .build()
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        debug!("Waiting for driver on {}", base_url);
        let session_id = match Self::wait_until_ready(&client, &base_url, &mut child, options.startup_timeout).await {
            Ok(()) => Self::new_session(&client, &base_url, options).await,
            Err(e) => Err(e),
        };

        let session_id = match session_id {
            Ok(id) => id,
            Err(e) => {
                if let Err(kill_error) = child.kill().await {
                    warn!("Failed to stop driver process: {}", kill_error);
                }
                // An incompatible browser/driver pair shows up as a refused session
                return Err(match e {
                    DriverError::Launch(_) => e,
                    other => DriverError::Launch(other.to_string()),
                });
            }
        };

        debug!("Browser session {} started", session_id);
        Ok(WebDriverSession {
            client,
            base_url,
            session_id,
            child: Some(child),
            closed: false,
        })
    }
}

/// A Firefox session driven through geckodriver
#[derive(Debug)]
pub struct WebDriverSession {
    client: Client,
    base_url: String,
    session_id: String,
    child: Option<Child>,
    closed: bool,
}

impl WebDriverSession {
    fn session_url(&self, path: &str) -> String {
        format!("{}/session/{}{}", self.base_url, self.session_id, path)
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, DriverError> {
        if self.closed {
            return Err(DriverError::SessionClosed);
        }

        let request = self.client.request(method, self.session_url(path));
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| DriverError::Request(e.to_string()))?;
        unwrap_response(response).await
    }

    async fn find_element(&self, selector: &str) -> Result<Option<ElementRef>, DriverError> {
        let body = json!({ "using": "css selector", "value": selector });
        match self.command(Method::POST, "/element", Some(body)).await {
            Ok(value) => value[ELEMENT_KEY]
                .as_str()
                .map(|id| Some(ElementRef::new(id)))
                .ok_or_else(|| DriverError::Request("Element reply has no reference".to_string())),
            Err(DriverError::Protocol { error, .. }) if error == "no such element" => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn element_flag(&self, element: &ElementRef, flag: &str) -> Result<bool, DriverError> {
        let path = format!("/element/{}/{}", element.id(), flag);
        let value = self.command(Method::GET, &path, None).await?;
        Ok(value.as_bool().unwrap_or(false))
    }
}

#[async_trait]
impl RemoteDriver for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.command(Method::POST, "/url", Some(json!({ "url": url }))).await?;
        Ok(())
    }

    async fn find_interactive(&mut self, selector: &str) -> Result<Option<ElementRef>, DriverError> {
        let element = match self.find_element(selector).await? {
            Some(element) => element,
            None => return Ok(None),
        };

        // Clickable means displayed and enabled; a node replaced meanwhile counts as not ready
        let interactive = match self.element_flag(&element, "displayed").await {
            Ok(true) => self.element_flag(&element, "enabled").await,
            Ok(false) => Ok(false),
            Err(e) => Err(e),
        };

        match interactive {
            Ok(true) => Ok(Some(element)),
            Ok(false) => Ok(None),
            Err(DriverError::Protocol { error, .. }) if error == "stale element reference" => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), DriverError> {
        let path = format!("/element/{}/value", element.id());
        self.command(Method::POST, &path, Some(json!({ "text": text }))).await?;
        Ok(())
    }

    async fn clear(&mut self, element: &ElementRef) -> Result<(), DriverError> {
        let path = format!("/element/{}/clear", element.id());
        self.command(Method::POST, &path, Some(json!({}))).await?;
        Ok(())
    }

    async fn read_text(&mut self, selector: &str) -> Result<String, DriverError> {
        let element = self
            .find_element(selector)
            .await?
            .ok_or_else(|| DriverError::NoSuchElement(selector.to_string()))?;

        let path = format!("/element/{}/text", element.id());
        let value = self.command(Method::GET, &path, None).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        let value = self.command(Method::GET, "/source", None).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn quit(&mut self) -> Result<(), DriverError> {
        if self.closed {
            return Ok(());
        }

        let result = self.command(Method::DELETE, "", None).await.map(|_| ());
        self.closed = true;

        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill().await {
                warn!("Failed to stop driver process: {}", e);
            }
        }

        result
    }
}

/// Extract the `value` of a WebDriver reply, mapping error replies
async fn unwrap_response(response: reqwest::Response) -> Result<Value, DriverError> {
    let status = response.status();
    let mut payload: Value = response
        .json()
        .await
        .map_err(|e| DriverError::Request(format!("Unreadable driver reply ({}): {}", status, e)))?;

    if status.is_success() {
        return Ok(payload["value"].take());
    }

    Err(protocol_error(&payload))
}

/// Map a WebDriver error body to a `DriverError`
pub fn protocol_error(payload: &Value) -> DriverError {
    let value = &payload["value"];
    DriverError::Protocol {
        error: value["error"].as_str().unwrap_or("unknown error").to_string(),
        message: value["message"].as_str().unwrap_or_default().to_string(),
    }
}
