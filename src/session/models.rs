/*!
 * Session states and timing settings.
 */

use std::fmt;
use std::time::Duration;

use crate::app_config::{Config, RenderWait};

/// State of a translation session
///
/// A run goes `Init -> Navigated -> Ready`, then cycles
/// `Submitting -> Waiting -> Extracted -> Ready` once per chunk, and ends in
/// `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Browser launched, no page loaded
    Init,
    /// Translator page requested
    Navigated,
    /// Input control located and interactive
    Ready,
    /// Chunk typed into the input control
    Submitting,
    /// Waiting for the translation to render
    Waiting,
    /// Translation read from the page
    Extracted,
    /// Browser session released
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Navigated => "navigated",
            Self::Ready => "ready",
            Self::Submitting => "submitting",
            Self::Waiting => "waiting",
            Self::Extracted => "extracted",
            Self::Closed => "closed",
        };
        write!(f, "{}", name)
    }
}

/// Waits applied by the session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTiming {
    /// Unconditional wait after navigation
    pub settle_delay: Duration,
    /// Unconditional wait after each submission (fixed strategy)
    pub render_delay: Duration,
    /// Upper bound when polling for the input control
    pub element_timeout: Duration,
    /// Rendering wait strategy
    pub render_wait: RenderWait,
}

impl SessionTiming {
    /// No waiting at all, for tests and dry runs
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            render_delay: Duration::ZERO,
            element_timeout: Duration::ZERO,
            render_wait: RenderWait::Fixed,
        }
    }
}

impl From<&Config> for SessionTiming {
    fn from(config: &Config) -> Self {
        // One setting drives both fixed delays
        Self {
            settle_delay: config.fixed_delay(),
            render_delay: config.fixed_delay(),
            element_timeout: config.element_timeout(),
            render_wait: config.render_wait.clone(),
        }
    }
}
