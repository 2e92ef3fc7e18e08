//! Relay failures and their client-facing mapping.

use common::ServiceError;
use thiserror::Error;

use crate::crypto::CipherError;
use crate::directory::LookupError;
use crate::push::PushError;

/// Why a send-message request was not relayed.
///
/// `Display` output is for server-side logs; callers only ever see the
/// [`ServiceError`] produced by [`RelayError::to_service_error`].
#[derive(Debug, Error)]
pub enum RelayError {
    /// A required field was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// An inbound field could not be opened.
    #[error("field {field} could not be opened: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: CipherError,
    },

    /// The recipient does not exist in the directory.
    #[error("recipient not found")]
    RecipientNotFound,

    /// The recipient exists but has no registered device.
    #[error("recipient has no push token")]
    RecipientHasNoToken,

    /// The directory could not be queried.
    #[error("user lookup failed: {0}")]
    LookupFailed(#[from] LookupError),

    /// An outbound field could not be sealed.
    #[error("field {field} could not be sealed: {source}")]
    EncodeFailed {
        field: &'static str,
        #[source]
        source: CipherError,
    },

    /// The push service did not accept the message.
    #[error("push dispatch failed: {0}")]
    DispatchFailed(#[from] PushError),
}

impl RelayError {
    /// Map to the generic client error. Codec failures all collapse into one
    /// message so responses cannot be used as a decryption oracle.
    pub fn to_service_error(&self) -> ServiceError {
        match self {
            RelayError::MissingField(_) => ServiceError::BadRequest("missing required fields".into()),
            RelayError::InvalidField { .. } => {
                ServiceError::BadRequest("invalid encrypted field".into())
            }
            RelayError::RecipientNotFound => ServiceError::NotFound("recipient not found".into()),
            RelayError::RecipientHasNoToken => {
                ServiceError::BadRequest("recipient has no push token".into())
            }
            RelayError::LookupFailed(_)
            | RelayError::EncodeFailed { .. }
            | RelayError::DispatchFailed(_) => ServiceError::internal(),
        }
    }
}
