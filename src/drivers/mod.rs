/*!
 * Remote browser drivers.
 *
 * The translation session only needs a narrow capability from the browser:
 * open a page, find an interactive element, type into it, clear it and read
 * the text rendered somewhere else on the page. This module defines that
 * capability and its implementations:
 * - `webdriver`: W3C WebDriver client driving geckodriver over HTTP
 * - `mock`: scripted in-memory driver for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::app_config::{BrowserConfig, secs_to_duration};
use crate::errors::DriverError;

/// Opaque handle to an element located by a driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Settings needed to start a browser and its driver
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run the browser without a visible window
    pub headless: bool,
    /// Browser executable
    pub browser_binary: PathBuf,
    /// Driver executable (geckodriver)
    pub driver_binary: PathBuf,
    /// Where the driver process writes its output, if anywhere
    pub driver_log: Option<PathBuf>,
    /// How long to wait for the driver to accept connections
    pub startup_timeout: Duration,
}

impl From<&BrowserConfig> for LaunchOptions {
    fn from(config: &BrowserConfig) -> Self {
        Self {
            headless: config.headless,
            browser_binary: config.binary_path.clone(),
            driver_binary: config.driver_path.clone(),
            driver_log: config.driver_log_path.clone(),
            startup_timeout: secs_to_duration(config.driver_startup_timeout_secs),
        }
    }
}

/// One live browser session
///
/// Methods take `&mut self`: a session has a single input slot and is never
/// driven from two places at once.
#[async_trait]
pub trait RemoteDriver: Send + Debug {
    /// Load `url` in the current window
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Find the element matching `selector` if it is displayed and enabled
    ///
    /// # Returns
    /// * `Ok(None)` - The element is missing or not interactive yet
    async fn find_interactive(&mut self, selector: &str) -> Result<Option<ElementRef>, DriverError>;

    /// Type `text` into an element
    async fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), DriverError>;

    /// Clear an editable element
    async fn clear(&mut self, element: &ElementRef) -> Result<(), DriverError>;

    /// Read the rendered text of the element matching `selector`
    async fn read_text(&mut self, selector: &str) -> Result<String, DriverError>;

    /// Markup of the current page
    async fn page_source(&mut self) -> Result<String, DriverError>;

    /// End the session and release the browser
    async fn quit(&mut self) -> Result<(), DriverError>;
}

/// Factory for driver sessions
#[async_trait]
pub trait DriverLauncher: Send + Sync {
    /// The driver type produced by this launcher
    type Driver: RemoteDriver;

    /// Start a new browser session
    async fn launch(&self, options: &LaunchOptions) -> Result<Self::Driver, DriverError>;
}

pub mod mock;
pub mod webdriver;
