//! Recipient lookup: username → device push token.
//!
//! The relay only depends on the [`UserDirectory`] trait; [`FirestoreDirectory`]
//! is the production implementation backed by the Firestore REST API.
//!
//! # Module invariants
//!
//! - **No crypto dependencies.** Usernames reach this module already opened.
//! - Usernames and tokens never appear in error messages or log fields.

pub mod firestore;

pub use firestore::FirestoreDirectory;

use async_trait::async_trait;
use thiserror::Error;

/// What the directory knows about a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Device push token; `None` when the user has never registered a device.
    pub push_token: Option<String>,
}

/// Errors produced by a directory backend.
///
/// "User not found" is not an error; it is `Ok(None)` from [`UserDirectory::lookup`].
#[derive(Debug, Error)]
pub enum LookupError {
    /// The request could not be built for this username.
    #[error("invalid lookup url")]
    InvalidUrl,

    /// The backend could not be reached or timed out.
    #[error("directory transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with an unexpected status.
    #[error("directory returned status {0}")]
    Status(u16),

    /// The backend's response body could not be parsed.
    #[error("invalid directory response: {0}")]
    InvalidResponse(String),
}

/// Source of user records keyed by plaintext username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up `username`, returning `Ok(None)` if no such user exists.
    async fn lookup(&self, username: &str) -> Result<Option<UserRecord>, LookupError>;
}
