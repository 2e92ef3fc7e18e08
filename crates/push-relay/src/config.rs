//! Configuration loading and validation for the relay service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::{FieldMode, SecretKey};

/// Placeholder substituted with the sender's username in [`Config::title_with_sender`].
pub const SENDER_PLACEHOLDER: &str = "{sender}";

/// Validated relay service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Hex-encoded 32-byte field encryption key. **Required.**
    pub encryption_key_hex: String,

    /// Whether message fields arrive and leave sealed or as plaintext.
    #[serde(default)]
    pub field_mode: FieldMode,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP/gRPC endpoint for span export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Firebase project hosting the user directory and push messaging. **Required.**
    pub firebase_project_id: String,

    /// OAuth2 bearer token presented to Firestore and FCM. **Required.**
    pub google_access_token: String,

    /// Firestore REST API root.
    #[serde(default = "default_firestore_base_url")]
    pub firestore_base_url: String,

    /// FCM HTTP v1 API root.
    #[serde(default = "default_fcm_base_url")]
    pub fcm_base_url: String,

    /// Firestore collection holding one document per username.
    #[serde(default = "default_users_collection")]
    pub users_collection: String,

    /// Document field carrying the recipient's device push token.
    #[serde(default = "default_push_token_field")]
    pub push_token_field: String,

    /// Per-call timeout (seconds) for user lookup and push dispatch.
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,

    /// Notification title used when the sender is anonymous.
    #[serde(default = "default_title_anonymous")]
    pub title_anonymous: String,

    /// Notification title template when the sender is known; must contain `{sender}`.
    #[serde(default = "default_title_with_sender")]
    pub title_with_sender: String,
}

fn default_port() -> u16 {
    3000
}
fn default_log_level() -> String {
    "info".into()
}
fn default_firestore_base_url() -> String {
    "https://firestore.googleapis.com/v1".into()
}
fn default_fcm_base_url() -> String {
    "https://fcm.googleapis.com".into()
}
fn default_users_collection() -> String {
    "users".into()
}
fn default_push_token_field() -> String {
    "fcmToken".into()
}
fn default_upstream_timeout() -> u64 {
    10
}
fn default_title_anonymous() -> String {
    "New message".into()
}
fn default_title_with_sender() -> String {
    format!("New message from {SENDER_PLACEHOLDER}")
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode the field encryption key.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_KEY_HEX` is not 64 hex characters.
    pub fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_hex(&self.encryption_key_hex).context("ENCRYPTION_KEY_HEX is invalid")
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.encryption_key_hex, "ENCRYPTION_KEY_HEX")?;
        self.secret_key()?;
        ensure_non_empty(&self.firebase_project_id, "FIREBASE_PROJECT_ID")?;
        ensure_non_empty(&self.google_access_token, "GOOGLE_ACCESS_TOKEN")?;
        ensure_non_empty(&self.firestore_base_url, "FIRESTORE_BASE_URL")?;
        ensure_non_empty(&self.fcm_base_url, "FCM_BASE_URL")?;
        ensure_non_empty(&self.users_collection, "USERS_COLLECTION")?;
        ensure_non_empty(&self.push_token_field, "PUSH_TOKEN_FIELD")?;
        ensure_non_empty(&self.title_anonymous, "TITLE_ANONYMOUS")?;

        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be > 0");
        }
        if !self.title_with_sender.contains(SENDER_PLACEHOLDER) {
            anyhow::bail!("TITLE_WITH_SENDER must contain {SENDER_PLACEHOLDER}");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("encryption_key_hex", &"[REDACTED]")
            .field("field_mode", &self.field_mode)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("firebase_project_id", &self.firebase_project_id)
            .field("google_access_token", &"[REDACTED]")
            .field("firestore_base_url", &self.firestore_base_url)
            .field("fcm_base_url", &self.fcm_base_url)
            .field("users_collection", &self.users_collection)
            .field("push_token_field", &self.push_token_field)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("title_anonymous", &self.title_anonymous)
            .field("title_with_sender", &self.title_with_sender)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn valid_config() -> Config {
        Config {
            encryption_key_hex: "00".repeat(32),
            field_mode: FieldMode::Encrypted,
            port: default_port(),
            log_level: default_log_level(),
            otel_exporter_otlp_endpoint: None,
            firebase_project_id: "chat-app".into(),
            google_access_token: "ya29.token".into(),
            firestore_base_url: default_firestore_base_url(),
            fcm_base_url: default_fcm_base_url(),
            users_collection: default_users_collection(),
            push_token_field: default_push_token_field(),
            upstream_timeout_secs: default_upstream_timeout(),
            title_anonymous: default_title_anonymous(),
            title_with_sender: default_title_with_sender(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_port(), 3000);
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_users_collection(), "users");
        assert_eq!(default_push_token_field(), "fcmToken");
        assert_eq!(default_upstream_timeout(), 10);
        assert_eq!(default_title_with_sender(), "New message from {sender}");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_key() {
        let cfg = Config {
            encryption_key_hex: "".into(),
            ..valid_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_short_key() {
        let cfg = Config {
            encryption_key_hex: "00".repeat(31),
            ..valid_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_hex_key() {
        let cfg = Config {
            encryption_key_hex: "g".repeat(64),
            ..valid_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_project() {
        let cfg = Config {
            firebase_project_id: " ".into(),
            ..valid_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = Config {
            upstream_timeout_secs: 0,
            ..valid_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_title_without_placeholder() {
        let cfg = Config {
            title_with_sender: "New message".into(),
            ..valid_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = Config {
            encryption_key_hex: "ab".repeat(32),
            ..valid_config()
        };
        let printed = format!("{cfg:?}");
        assert!(!printed.contains(&"ab".repeat(32)));
        assert!(!printed.contains("ya29.token"));
        assert!(printed.contains("[REDACTED]"));
    }
}
