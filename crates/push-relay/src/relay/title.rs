//! Notification title derivation.

use crate::config::{Config, SENDER_PLACEHOLDER};

/// Title strings chosen by whether the sender identified themselves.
#[derive(Debug, Clone)]
pub struct NotificationTitles {
    anonymous: String,
    with_sender: String,
}

impl NotificationTitles {
    /// `with_sender` is expected to contain `{sender}`.
    pub fn new(anonymous: impl Into<String>, with_sender: impl Into<String>) -> Self {
        Self {
            anonymous: anonymous.into(),
            with_sender: with_sender.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.title_anonymous.clone(), cfg.title_with_sender.clone())
    }

    /// Plaintext title for a message from `sender` (empty = anonymous).
    pub fn render(&self, sender: &str) -> String {
        if sender.is_empty() {
            self.anonymous.clone()
        } else {
            self.with_sender.replace(SENDER_PLACEHOLDER, sender)
        }
    }
}

impl Default for NotificationTitles {
    fn default() -> Self {
        Self::new("New message", format!("New message from {SENDER_PLACEHOLDER}"))
    }
}
