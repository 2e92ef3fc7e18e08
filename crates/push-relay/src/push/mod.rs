//! Push delivery: hand a prepared notification to the platform push service.
//!
//! The relay only depends on the [`PushDispatcher`] trait; [`FcmDispatcher`] is
//! the production implementation backed by the FCM HTTP v1 API.

pub mod fcm;

pub use fcm::FcmDispatcher;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

/// One notification addressed to one device.
///
/// `title`, `body` and the `data` values are already in their outbound wire
/// form (sealed in `encrypted` mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    /// Recipient device token.
    pub token: String,
    pub title: String,
    pub body: String,
    /// Extra string key/value fields delivered to the client app.
    pub data: BTreeMap<String, String>,
}

/// Errors produced by a push backend.
#[derive(Debug, Error)]
pub enum PushError {
    /// The request URL could not be built.
    #[error("invalid push url")]
    InvalidUrl,

    /// The backend could not be reached or timed out.
    #[error("push transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend rejected the message.
    #[error("push service returned status {0}")]
    Status(u16),

    /// The backend's response body could not be parsed.
    #[error("invalid push response: {0}")]
    InvalidResponse(String),
}

/// Delivery channel returning an opaque message identifier on success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushDispatcher: Send + Sync {
    /// Submit `message` for delivery. No retries are attempted.
    async fn send(&self, message: PushMessage) -> Result<String, PushError>;
}
