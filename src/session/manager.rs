/*!
 * Translation session state machine.
 *
 * A `TranslationSession` owns exactly one browser session for the duration of
 * a run. Chunks go through the page's single input box one at a time:
 * type, wait, read, clear. Any failure ends the run; nothing is retried.
 */

use log::{debug, info};
use std::time::Duration;
use tokio::time::{Instant, sleep};

use super::models::{SessionState, SessionTiming};
use crate::app_config::{RenderWait, SelectorConfig, secs_to_duration};
use crate::drivers::{DriverLauncher, ElementRef, LaunchOptions, RemoteDriver};
use crate::errors::SessionError;

/// Interval between probes for the input control
const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Point in time `timeout` from now; `None` when it lies beyond the clock's range
fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

/// One exclusive session with the remote translator
#[derive(Debug)]
pub struct TranslationSession<D: RemoteDriver> {
    driver: D,
    selectors: SelectorConfig,
    state: SessionState,
    input: Option<ElementRef>,
}

impl<D: RemoteDriver> TranslationSession<D> {
    /// Launch a new browser session
    pub async fn initialize<L>(
        launcher: &L,
        options: &LaunchOptions,
        selectors: SelectorConfig,
    ) -> Result<Self, SessionError>
    where
        L: DriverLauncher<Driver = D>,
    {
        let driver = launcher
            .launch(options)
            .await
            .map_err(|e| SessionError::SessionLaunch(e.to_string()))?;

        Ok(Self {
            driver,
            selectors,
            state: SessionState::Init,
            input: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state != expected {
            return Err(SessionError::InvalidState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    fn input_element(&self) -> Result<&ElementRef, SessionError> {
        self.input.as_ref().ok_or_else(|| SessionError::InvalidState {
            expected: SessionState::Ready.to_string(),
            actual: self.state.to_string(),
        })
    }

    /// Load the translator page, then sleep `settle_delay`
    ///
    /// The page is not checked for readiness; the delay is all there is.
    pub async fn navigate(&mut self, url: &str, settle_delay: Duration) -> Result<(), SessionError> {
        self.expect_state(SessionState::Init)?;
        debug!("Opening {}", url);
        self.driver.navigate(url).await?;
        self.state = SessionState::Navigated;

        sleep(settle_delay).await;
        Ok(())
    }

    /// Poll until the input control is displayed and enabled
    ///
    /// Probes at least once, then every 500 ms until `timeout` has elapsed.
    pub async fn locate_input_element(&mut self, timeout: Duration) -> Result<(), SessionError> {
        self.expect_state(SessionState::Navigated)?;
        let deadline = deadline_after(timeout);

        loop {
            if let Some(element) = self.driver.find_interactive(&self.selectors.input).await? {
                self.input = Some(element);
                self.state = SessionState::Ready;
                return Ok(());
            }

            let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));
            if remaining == Some(Duration::ZERO) {
                return Err(SessionError::ElementNotFound {
                    selector: self.selectors.input.clone(),
                    timeout_secs: timeout.as_secs_f64(),
                });
            }
            sleep(remaining.map_or(ELEMENT_POLL_INTERVAL, |r| ELEMENT_POLL_INTERVAL.min(r))).await;
        }
    }

    /// Type a chunk into the input control
    ///
    /// The control is expected to be empty; the chunk loop guarantees it.
    pub async fn submit_chunk(&mut self, text: &str) -> Result<(), SessionError> {
        self.expect_state(SessionState::Ready)?;
        let element = self.input_element()?.clone();
        self.driver.send_keys(&element, text).await?;
        self.state = SessionState::Submitting;
        Ok(())
    }

    /// Wait for the submitted chunk to render
    ///
    /// With `RenderWait::Fixed` this sleeps `timing.render_delay` and checks
    /// nothing. `RenderWait::PollUntilStable` reads the output until it is
    /// non-empty and identical on two consecutive reads, or its timeout runs out.
    pub async fn await_rendering(&mut self, timing: &SessionTiming) -> Result<(), SessionError> {
        self.expect_state(SessionState::Submitting)?;
        self.state = SessionState::Waiting;

        match &timing.render_wait {
            RenderWait::Fixed => sleep(timing.render_delay).await,
            RenderWait::PollUntilStable { interval_ms, timeout_secs } => {
                let interval = Duration::from_millis(*interval_ms);
                let deadline = deadline_after(secs_to_duration(*timeout_secs));
                let mut previous = String::new();

                loop {
                    sleep(interval).await;
                    let current = self.driver.read_text(&self.selectors.output).await?;
                    if !current.is_empty() && current == previous {
                        break;
                    }
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        debug!("Output still changing after {}s, reading it anyway", timeout_secs);
                        break;
                    }
                    previous = current;
                }
            }
        }

        Ok(())
    }

    /// Read the rendered translation verbatim
    ///
    /// If rendering has not finished, this returns whatever is on the page.
    pub async fn extract_result(&mut self) -> Result<String, SessionError> {
        self.expect_state(SessionState::Waiting)?;
        let text = self.driver.read_text(&self.selectors.output).await?;
        self.state = SessionState::Extracted;
        Ok(text)
    }

    /// Empty the input control for the next chunk
    pub async fn clear_input(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::Extracted)?;
        let element = self.input_element()?.clone();
        self.driver.clear(&element).await?;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Translate every chunk in order
    ///
    /// Results are index-aligned with `chunks`. The first failure aborts the
    /// loop and the partial results are dropped.
    pub async fn translate_all<F>(
        &mut self,
        chunks: &[String],
        timing: &SessionTiming,
        mut progress: F,
    ) -> Result<Vec<String>, SessionError>
    where
        F: FnMut(usize, usize) + Send,
    {
        let total = chunks.len();
        let mut results = Vec::with_capacity(total);

        for (index, chunk) in chunks.iter().enumerate() {
            debug!("Translating chunk {} of {}", index + 1, total);
            self.submit_chunk(chunk).await?;
            self.await_rendering(timing).await?;
            results.push(self.extract_result().await?);
            self.clear_input().await?;
            progress(index + 1, total);
        }

        info!("Translated {} chunk(s)", results.len());
        Ok(results)
    }

    /// Markup of the current page
    pub async fn page_source(&mut self) -> Result<String, SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::InvalidState {
                expected: "open".to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(self.driver.page_source().await?)
    }

    /// Release the browser session; calling it again does nothing
    pub async fn close(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        self.input = None;
        self.driver.quit().await?;
        Ok(())
    }
}
