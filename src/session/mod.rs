/*!
 * Translation session over a remote browser.
 *
 * This module provides:
 * - The session state machine driving one browser session per run
 * - Timing settings for the fixed and polled waits
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::TranslationSession;
pub use models::{SessionState, SessionTiming};
