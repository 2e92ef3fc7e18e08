//! Request and response bodies of the public HTTP API.
//!
//! Field names follow the camelCase wire format used by the mobile clients.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Send-message endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /sendMessage`.
///
/// Every field is optional at the serde level so that an absent field surfaces
/// as a domain-level "missing field" error rather than a JSON rejection.
/// Depending on the service's field mode, values are envelopes or plaintext.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Recipient username.
    #[serde(default)]
    pub to_username: Option<String>,
    /// Message text.
    #[serde(default)]
    pub text: Option<String>,
    /// Sender username, if the sender chose to identify themselves.
    #[serde(default)]
    pub from_username: Option<String>,
}

/// Successful response body for `POST /sendMessage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    /// Always `true`; present so clients can branch on a single flag.
    pub ok: bool,
    /// Opaque delivery identifier returned by the push service.
    pub message_id: String,
}

impl SendMessageResponse {
    /// Wrap a delivery identifier in a successful response.
    pub fn delivered(message_id: impl Into<String>) -> Self {
        Self {
            ok: true,
            message_id: message_id.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description safe to expose to callers.
    pub error: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` once the process is serving.
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}
