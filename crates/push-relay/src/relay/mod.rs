//! Send-message orchestration around the field codec.
//!
//! # Flow
//!
//! 1. Check that `toUsername` and `text` are present.
//! 2. Decode every inbound field. Any failure aborts before the directory or
//!    push service is contacted.
//! 3. Look up the recipient's push token.
//! 4. Derive the notification title and encode the outbound fields.
//! 5. Dispatch one data-only push message.

pub mod error;
pub mod title;

pub use error::RelayError;
pub use title::NotificationTitles;

use std::collections::BTreeMap;
use std::sync::Arc;

use common::protocol::SendMessageRequest;
use tracing::debug;

use crate::crypto::FieldCodec;
use crate::directory::UserDirectory;
use crate::push::{PushDispatcher, PushMessage};

/// Data keys of the dispatched message, as read by the client apps.
pub const DATA_TO_USERNAME: &str = "toUsername";
pub const DATA_FROM_USERNAME: &str = "fromUsername";
pub const DATA_TEXT: &str = "text";

/// Relays one chat message per call. Cheap to clone.
#[derive(Clone)]
pub struct Relay {
    codec: FieldCodec,
    directory: Arc<dyn UserDirectory>,
    push: Arc<dyn PushDispatcher>,
    titles: NotificationTitles,
}

impl Relay {
    pub fn new(
        codec: FieldCodec,
        directory: Arc<dyn UserDirectory>,
        push: Arc<dyn PushDispatcher>,
        titles: NotificationTitles,
    ) -> Self {
        Self {
            codec,
            directory,
            push,
            titles,
        }
    }

    /// Relay `req` to the recipient's device, returning the push service's
    /// delivery identifier.
    ///
    /// # Errors
    ///
    /// See [`RelayError`]; each variant aborts the whole request.
    pub async fn send_message(&self, req: SendMessageRequest) -> Result<String, RelayError> {
        let to_wire = required(req.to_username, DATA_TO_USERNAME)?;
        let text_wire = required(req.text, DATA_TEXT)?;
        let from_wire = req.from_username.unwrap_or_default();

        let to = self.decode(&to_wire, DATA_TO_USERNAME)?;
        let text = self.decode(&text_wire, DATA_TEXT)?;
        let from = self.decode(&from_wire, DATA_FROM_USERNAME)?;
        if to.is_empty() {
            return Err(RelayError::MissingField(DATA_TO_USERNAME));
        }
        if text.is_empty() {
            return Err(RelayError::MissingField(DATA_TEXT));
        }

        let token = self
            .directory
            .lookup(&to)
            .await?
            .ok_or(RelayError::RecipientNotFound)?
            .push_token
            .ok_or(RelayError::RecipientHasNoToken)?;

        let title = self.titles.render(&from);

        let enc_to = self.encode(&to, DATA_TO_USERNAME)?;
        let enc_from = self.encode(&from, DATA_FROM_USERNAME)?;
        let enc_text = self.encode(&text, DATA_TEXT)?;
        let enc_title = self.encode(&title, "title")?;

        let mut data = BTreeMap::new();
        data.insert(DATA_TO_USERNAME.to_owned(), enc_to);
        data.insert(DATA_FROM_USERNAME.to_owned(), enc_from);
        data.insert(DATA_TEXT.to_owned(), enc_text.clone());

        let message = PushMessage {
            token,
            title: enc_title,
            body: enc_text,
            data,
        };

        let message_id = self.push.send(message).await?;
        debug!(anonymous = from.is_empty(), "message relayed");
        Ok(message_id)
    }

    fn decode(&self, value: &str, field: &'static str) -> Result<String, RelayError> {
        self.codec
            .decode(value)
            .map_err(|source| RelayError::InvalidField { field, source })
    }

    fn encode(&self, value: &str, field: &'static str) -> Result<String, RelayError> {
        self.codec
            .encode(value)
            .map_err(|source| RelayError::EncodeFailed { field, source })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RelayError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(RelayError::MissingField(field))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::crypto::{open, seal, FieldMode, SecretKey, KEY_LEN};
    use crate::directory::{LookupError, MockUserDirectory, UserRecord};
    use crate::push::{MockPushDispatcher, PushError};

    pub(crate) fn test_key() -> Arc<SecretKey> {
        Arc::new(SecretKey::from_bytes([0x11; KEY_LEN]))
    }

    pub(crate) fn directory_with(username: &'static str, token: Option<&'static str>) -> MockUserDirectory {
        let mut dir = MockUserDirectory::new();
        dir.expect_lookup().returning(move |u| {
            if u == username {
                Ok(Some(UserRecord {
                    push_token: token.map(str::to_owned),
                }))
            } else {
                Ok(None)
            }
        });
        dir
    }

    /// Dispatcher that records the message it was handed.
    pub(crate) fn capturing_push(slot: Arc<Mutex<Option<PushMessage>>>) -> MockPushDispatcher {
        let mut push = MockPushDispatcher::new();
        push.expect_send().times(1).returning(move |m| {
            *slot.lock().unwrap() = Some(m);
            Ok("projects/chat-app/messages/42".into())
        });
        push
    }

    fn relay(
        mode: FieldMode,
        dir: MockUserDirectory,
        push: MockPushDispatcher,
    ) -> Relay {
        Relay::new(
            FieldCodec::new(mode, test_key()),
            Arc::new(dir),
            Arc::new(push),
            NotificationTitles::default(),
        )
    }

    fn sealed(value: &str) -> Option<String> {
        Some(seal(value, &test_key()).unwrap())
    }

    fn idle_push() -> MockPushDispatcher {
        let mut push = MockPushDispatcher::new();
        push.expect_send().never();
        push
    }

    fn idle_directory() -> MockUserDirectory {
        let mut dir = MockUserDirectory::new();
        dir.expect_lookup().never();
        dir
    }

    #[tokio::test]
    async fn encrypted_round_trip() {
        let slot = Arc::new(Mutex::new(None));
        let r = relay(
            FieldMode::Encrypted,
            directory_with("bob", Some("device-123")),
            capturing_push(slot.clone()),
        );
        let id = r
            .send_message(SendMessageRequest {
                to_username: sealed("bob"),
                text: sealed("hola"),
                from_username: sealed("alice"),
            })
            .await
            .unwrap();
        assert_eq!(id, "projects/chat-app/messages/42");

        let msg = slot.lock().unwrap().take().unwrap();
        let key = test_key();
        assert_eq!(msg.token, "device-123");
        assert_eq!(open(&msg.title, &key).unwrap(), "New message from alice");
        assert_eq!(open(&msg.body, &key).unwrap(), "hola");
        assert_eq!(open(&msg.data[DATA_TO_USERNAME], &key).unwrap(), "bob");
        assert_eq!(open(&msg.data[DATA_FROM_USERNAME], &key).unwrap(), "alice");
        assert_eq!(open(&msg.data[DATA_TEXT], &key).unwrap(), "hola");
        // Re-sealed with fresh nonces, not echoed.
        assert_ne!(Some(msg.data[DATA_TO_USERNAME].clone()), sealed("bob"));
    }

    #[tokio::test]
    async fn anonymous_sender_keeps_empty_sentinel() {
        let slot = Arc::new(Mutex::new(None));
        let r = relay(
            FieldMode::Encrypted,
            directory_with("bob", Some("device-123")),
            capturing_push(slot.clone()),
        );
        r.send_message(SendMessageRequest {
            to_username: sealed("bob"),
            text: sealed("hola"),
            from_username: None,
        })
        .await
        .unwrap();

        let msg = slot.lock().unwrap().take().unwrap();
        assert_eq!(msg.data[DATA_FROM_USERNAME], "");
        assert_eq!(open(&msg.title, &test_key()).unwrap(), "New message");
    }

    #[tokio::test]
    async fn plaintext_mode_passes_fields_through() {
        let slot = Arc::new(Mutex::new(None));
        let r = relay(
            FieldMode::Plaintext,
            directory_with("bob", Some("device-123")),
            capturing_push(slot.clone()),
        );
        r.send_message(SendMessageRequest {
            to_username: Some("bob".into()),
            text: Some("hola".into()),
            from_username: Some("alice".into()),
        })
        .await
        .unwrap();

        let msg = slot.lock().unwrap().take().unwrap();
        assert_eq!(msg.title, "New message from alice");
        assert_eq!(msg.body, "hola");
        assert_eq!(msg.data[DATA_TO_USERNAME], "bob");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_lookup() {
        let r = relay(FieldMode::Encrypted, idle_directory(), idle_push());
        let err = r
            .send_message(SendMessageRequest {
                to_username: None,
                text: sealed("hola"),
                from_username: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::MissingField(DATA_TO_USERNAME)));

        let err = r
            .send_message(SendMessageRequest {
                to_username: sealed("bob"),
                text: Some(String::new()),
                from_username: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::MissingField(DATA_TEXT)));
    }

    #[tokio::test]
    async fn bad_envelope_aborts_before_lookup() {
        let r = relay(FieldMode::Encrypted, idle_directory(), idle_push());
        let err = r
            .send_message(SendMessageRequest {
                to_username: sealed("bob"),
                text: sealed("hola"),
                from_username: Some("not-an-envelope".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RelayError::InvalidField {
                field: DATA_FROM_USERNAME,
                source: crate::crypto::CipherError::MalformedEnvelope
            }
        ));
    }

    #[tokio::test]
    async fn wrong_key_envelope_is_invalid_field() {
        let r = relay(FieldMode::Encrypted, idle_directory(), idle_push());
        let other_key = SecretKey::from_bytes([0x22; KEY_LEN]);
        let err = r
            .send_message(SendMessageRequest {
                to_username: Some(seal("bob", &other_key).unwrap()),
                text: sealed("hola"),
                from_username: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RelayError::InvalidField {
                field: DATA_TO_USERNAME,
                source: crate::crypto::CipherError::AuthenticationFailed
            }
        ));
    }

    #[tokio::test]
    async fn unknown_recipient() {
        let r = relay(FieldMode::Encrypted, directory_with("bob", Some("t")), idle_push());
        let err = r
            .send_message(SendMessageRequest {
                to_username: sealed("ghost"),
                text: sealed("hola"),
                from_username: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::RecipientNotFound));
    }

    #[tokio::test]
    async fn recipient_without_token() {
        let r = relay(FieldMode::Encrypted, directory_with("bob", None), idle_push());
        let err = r
            .send_message(SendMessageRequest {
                to_username: sealed("bob"),
                text: sealed("hola"),
                from_username: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::RecipientHasNoToken));
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let mut dir = MockUserDirectory::new();
        dir.expect_lookup()
            .withf(|u| u == "bob")
            .returning(|_| Err(LookupError::Status(503)));
        let r = relay(FieldMode::Encrypted, dir, idle_push());
        let err = r
            .send_message(SendMessageRequest {
                to_username: sealed("bob"),
                text: sealed("hola"),
                from_username: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::LookupFailed(LookupError::Status(503))));
    }

    #[tokio::test]
    async fn dispatch_failure_propagates() {
        let mut push = MockPushDispatcher::new();
        push.expect_send()
            .times(1)
            .returning(|_| Err(PushError::Status(404)));
        let r = relay(FieldMode::Encrypted, directory_with("bob", Some("t")), push);
        let err = r
            .send_message(SendMessageRequest {
                to_username: sealed("bob"),
                text: sealed("hola"),
                from_username: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::DispatchFailed(PushError::Status(404))));
    }
}
