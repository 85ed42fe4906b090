//! Error types for the saisie-core library.

use thiserror::Error;

/// Main error type for the saisie library.
#[derive(Error, Debug)]
pub enum SaisieError {
    /// Extraction session error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Composed document payload error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors reported by an extraction session.
///
/// None of these are fatal: the form stays consistent and editable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Text was selected while no field had focus.
    #[error("select a field first")]
    NoActiveField,

    /// The session was closed and no longer accepts input.
    #[error("session is closed")]
    Closed,
}

/// Errors related to the composed act text payload.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The payload carried no data.
    #[error("payload has no data")]
    EmptyPayload,

    /// The payload (or its nested data string) is not valid JSON.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Result type for the saisie library.
pub type Result<T> = std::result::Result<T, SaisieError>;
