//! Shared application state injected into every Axum handler.

use crate::relay::Relay;

/// Application state shared across all request handlers.
///
/// Cloned per request by Axum; every field is `Arc`-backed so the clone is
/// cheap and the key is never copied.
#[derive(Clone)]
pub struct AppState {
    /// Field codec plus the user-lookup and push collaborators.
    pub relay: Relay,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self { relay }
    }
}
