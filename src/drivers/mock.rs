/*!
 * Mock driver implementations for testing.
 *
 * The mock simulates a translator page with one input box and one output
 * box. Typing into the input "renders" a translation into the output, either
 * immediately or after a number of reads. Every interaction is recorded as a
 * `MockEvent` so tests can check ordering and cleanup:
 * - `MockLauncher::working()` - Pages become ready at once and translate everything
 * - `MockLauncher::never_ready()` - The input box never becomes interactive
 * - `MockLauncher::failing_launch()` - The browser cannot be started
 * - `MockLauncher::failing_on_submit(n)` - Typing the n-th chunk fails
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use super::{DriverLauncher, ElementRef, LaunchOptions, RemoteDriver};
use crate::errors::DriverError;

/// Id of the single input element exposed by the mock page
const INPUT_ELEMENT_ID: &str = "mock-input";

/// Behavior mode for the mock driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Everything succeeds
    Working,
    /// The browser cannot be launched
    LaunchFailure,
    /// The input element never becomes interactive
    NeverReady,
    /// The input element becomes interactive after this many probes
    ReadyAfterProbes(usize),
    /// Typing fails on the submission with this zero-based index
    FailOnSubmit { at: usize },
    /// Ending the session fails
    FailOnQuit,
}

/// Interaction recorded by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockEvent {
    Launched { headless: bool },
    Navigated(String),
    Probed(String),
    Typed(String),
    Read(String),
    Cleared,
    Quit,
}

/// State shared between a launcher and the drivers it creates
#[derive(Debug, Default)]
struct MockPage {
    events: Vec<MockEvent>,
    input: String,
    rendered: String,
    reads_until_rendered: usize,
    probes: usize,
    submissions: usize,
    launches: usize,
}

/// Launcher producing `MockDriver` sessions
#[derive(Debug, Clone)]
pub struct MockLauncher {
    behavior: MockBehavior,
    render_after_reads: usize,
    translate: fn(&str) -> String,
    page: Arc<Mutex<MockPage>>,
}

impl MockLauncher {
    /// Create a new mock launcher with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            render_after_reads: 0,
            translate: default_translation,
            page: Arc::new(Mutex::new(MockPage::default())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn never_ready() -> Self {
        Self::new(MockBehavior::NeverReady)
    }

    pub fn failing_launch() -> Self {
        Self::new(MockBehavior::LaunchFailure)
    }

    pub fn failing_on_submit(at: usize) -> Self {
        Self::new(MockBehavior::FailOnSubmit { at })
    }

    /// Output stays empty for the first `reads` reads after each submission
    pub fn with_render_after_reads(mut self, reads: usize) -> Self {
        self.render_after_reads = reads;
        self
    }

    /// Set a custom translation function
    pub fn with_translation(mut self, translate: fn(&str) -> String) -> Self {
        self.translate = translate;
        self
    }

    /// All interactions recorded so far
    pub fn events(&self) -> Vec<MockEvent> {
        self.page.lock().events.clone()
    }

    /// Number of sessions launched
    pub fn launches(&self) -> usize {
        self.page.lock().launches
    }

    /// Whether the last session was ended
    pub fn was_quit(&self) -> bool {
        self.page.lock().events.last() == Some(&MockEvent::Quit)
    }

    /// Texts typed into the input, in order
    pub fn typed(&self) -> Vec<String> {
        self.page
            .lock()
            .events
            .iter()
            .filter_map(|event| match event {
                MockEvent::Typed(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Default mock translation: wrap the text in markers
pub fn default_translation(text: &str) -> String {
    format!("<{}>", text)
}

#[async_trait]
impl DriverLauncher for MockLauncher {
    type Driver = MockDriver;

    async fn launch(&self, options: &LaunchOptions) -> Result<MockDriver, DriverError> {
        if self.behavior == MockBehavior::LaunchFailure {
            return Err(DriverError::Launch(format!(
                "Simulated launch failure for {}",
                options.driver_binary.display()
            )));
        }

        let mut page = self.page.lock();
        page.launches += 1;
        page.events.push(MockEvent::Launched { headless: options.headless });

        Ok(MockDriver {
            behavior: self.behavior,
            render_after_reads: self.render_after_reads,
            translate: self.translate,
            page: Arc::clone(&self.page),
            closed: false,
        })
    }
}

/// Scripted in-memory browser session
#[derive(Debug)]
pub struct MockDriver {
    behavior: MockBehavior,
    render_after_reads: usize,
    translate: fn(&str) -> String,
    page: Arc<Mutex<MockPage>>,
    closed: bool,
}

impl MockDriver {
    fn ensure_open(&self) -> Result<(), DriverError> {
        if self.closed {
            return Err(DriverError::SessionClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.ensure_open()?;
        self.page.lock().events.push(MockEvent::Navigated(url.to_string()));
        Ok(())
    }

    async fn find_interactive(&mut self, selector: &str) -> Result<Option<ElementRef>, DriverError> {
        self.ensure_open()?;
        let mut page = self.page.lock();
        page.probes += 1;
        page.events.push(MockEvent::Probed(selector.to_string()));

        let ready = match self.behavior {
            MockBehavior::NeverReady => false,
            MockBehavior::ReadyAfterProbes(n) => page.probes > n,
            _ => true,
        };

        Ok(ready.then(|| ElementRef::new(INPUT_ELEMENT_ID)))
    }

    async fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), DriverError> {
        self.ensure_open()?;
        if element.id() != INPUT_ELEMENT_ID {
            return Err(DriverError::NoSuchElement(element.id().to_string()));
        }

        let mut page = self.page.lock();
        let index = page.submissions;
        page.submissions += 1;

        if self.behavior == (MockBehavior::FailOnSubmit { at: index }) {
            return Err(DriverError::Protocol {
                error: "element not interactable".to_string(),
                message: format!("Simulated failure on submission {}", index),
            });
        }

        page.events.push(MockEvent::Typed(text.to_string()));
        // Typing appends, like a real text box
        page.input.push_str(text);
        page.rendered = (self.translate)(&page.input);
        page.reads_until_rendered = self.render_after_reads;
        Ok(())
    }

    async fn clear(&mut self, _element: &ElementRef) -> Result<(), DriverError> {
        self.ensure_open()?;
        let mut page = self.page.lock();
        page.events.push(MockEvent::Cleared);
        page.input.clear();
        page.rendered.clear();
        Ok(())
    }

    async fn read_text(&mut self, selector: &str) -> Result<String, DriverError> {
        self.ensure_open()?;
        let mut page = self.page.lock();
        page.events.push(MockEvent::Read(selector.to_string()));

        if page.reads_until_rendered > 0 {
            page.reads_until_rendered -= 1;
            return Ok(String::new());
        }
        Ok(page.rendered.clone())
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        self.ensure_open()?;
        Ok("<html><body><d-textarea name=\"source\"></d-textarea></body></html>".to_string())
    }

    async fn quit(&mut self) -> Result<(), DriverError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.page.lock().events.push(MockEvent::Quit);

        if self.behavior == MockBehavior::FailOnQuit {
            return Err(DriverError::Request("Simulated quit failure".to_string()));
        }
        Ok(())
    }
}
