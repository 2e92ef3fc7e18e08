//! Client-facing error type shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// The carried message is what the caller sees in the `error` field of the
/// response body, so it must never contain ciphertext, tokens, or key material.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: bad JSON, a missing field, or an envelope
    /// that could not be opened.
    #[error("{0}")]
    BadRequest(String),

    /// The addressed resource (route or recipient) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A collaborator failed or an unexpected internal error occurred.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Generic 500 used whenever internal detail must stay server-side.
    pub fn internal() -> Self {
        ServiceError::Internal("internal error".into())
    }
}
