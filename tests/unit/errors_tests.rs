/*!
 * Tests for error types and conversions
 */

use std::io;
use std::path::PathBuf;

use webslate::errors::{AppError, DriverError, SessionError};

#[test]
fn test_appError_inputNotFound_shouldNameThePath() {
    let err = AppError::InputNotFound(PathBuf::from("missing.txt"));
    assert_eq!(err.to_string(), "Input file not found: missing.txt");
}

#[test]
fn test_driverError_intoAppError_shouldWrapInSession() {
    let err: AppError = DriverError::NoSuchElement("#out".to_string()).into();
    assert!(matches!(
        err,
        AppError::Session(SessionError::Driver(DriverError::NoSuchElement(_)))
    ));
    assert!(err.to_string().contains("#out"));
}

#[test]
fn test_sessionError_elementNotFound_shouldMentionSelectorAndTimeout() {
    let err = SessionError::ElementNotFound {
        selector: "div[role='textbox']".to_string(),
        timeout_secs: 8.0,
    };
    let message = err.to_string();
    assert!(message.contains("div[role='textbox']"));
    assert!(message.contains("8s"));
}

#[test]
fn test_sessionError_invalidState_shouldNameBothStates() {
    let err = SessionError::InvalidState {
        expected: "ready".to_string(),
        actual: "closed".to_string(),
    };
    assert_eq!(err.to_string(), "Invalid session state: expected ready, was closed");
}

#[test]
fn test_driverError_protocol_shouldShowCodeAndMessage() {
    let err = DriverError::Protocol {
        error: "session not created".to_string(),
        message: "binary missing".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Driver responded with error: session not created - binary missing"
    );
}

#[test]
fn test_ioError_intoAppError_shouldBecomeFileError() {
    let err: AppError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
    assert!(matches!(err, AppError::File(_)));
}

#[test]
fn test_anyhowError_intoAppError_shouldBecomeUnknown() {
    let err: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(err, AppError::Unknown(ref m) if m == "boom"));
}
