/*!
 * Error types for the webslate application.
 *
 * Each layer has its own error enum, built with thiserror:
 * - `DriverError`: transport and protocol failures of the remote browser driver
 * - `SessionError`: failures of the translation session state machine
 * - `AppError`: top-level errors surfaced by the controller
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a remote browser driver
#[derive(Error, Debug)]
pub enum DriverError {
    /// The driver or browser process could not be started
    #[error("Failed to launch driver: {0}")]
    Launch(String),

    /// A request to the driver could not be sent or its reply could not be read
    #[error("Driver request failed: {0}")]
    Request(String),

    /// The driver answered with a WebDriver error
    #[error("Driver responded with error: {error} - {message}")]
    Protocol {
        /// WebDriver error code (e.g. "session not created")
        error: String,
        /// Human readable message from the driver
        message: String,
    },

    /// No element matched the selector
    #[error("No element matches selector: {0}")]
    NoSuchElement(String),

    /// The session has already been closed
    #[error("Driver session is closed")]
    SessionClosed,
}

/// Errors raised by the translation session
#[derive(Error, Debug)]
pub enum SessionError {
    /// The browser or its driver is missing or incompatible
    #[error("Failed to launch browser session: {0}")]
    SessionLaunch(String),

    /// The input control never became interactive within the timeout
    #[error("Element '{selector}' not interactive after {timeout_secs}s")]
    ElementNotFound {
        /// CSS selector that was polled
        selector: String,
        /// Timeout that elapsed
        timeout_secs: f64,
    },

    /// An operation was attempted in the wrong state
    #[error("Invalid session state: expected {expected}, was {actual}")]
    InvalidState {
        /// State the operation requires
        expected: String,
        /// State the session was in
        actual: String,
    },

    /// Any other driver failure during the run
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The input file does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the translation session
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<DriverError> for AppError {
    fn from(error: DriverError) -> Self {
        Self::Session(SessionError::Driver(error))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
