//! Per-deployment field transform: seal/open in `encrypted` mode, identity in
//! `plaintext` mode.

use std::sync::Arc;

use serde::Deserialize;

use super::{open, seal, CipherError, SecretKey};

/// Whether protected fields travel as envelopes or as plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
    /// Inbound fields are opened and outbound fields are sealed.
    #[default]
    Encrypted,
    /// Fields pass through untouched.
    Plaintext,
}

/// Field transform bound to the shared key.
///
/// Cheap to clone; the key lives behind an `Arc` and is never mutated.
#[derive(Debug, Clone)]
pub struct FieldCodec {
    mode: FieldMode,
    key: Arc<SecretKey>,
}

impl FieldCodec {
    pub fn new(mode: FieldMode, key: Arc<SecretKey>) -> Self {
        Self { mode, key }
    }

    /// Turn an inbound wire value into plaintext.
    pub fn decode(&self, value: &str) -> Result<String, CipherError> {
        match self.mode {
            FieldMode::Encrypted => open(value, &self.key),
            FieldMode::Plaintext => Ok(value.to_owned()),
        }
    }

    /// Turn a plaintext value into its outbound wire form.
    pub fn encode(&self, value: &str) -> Result<String, CipherError> {
        match self.mode {
            FieldMode::Encrypted => seal(value, &self.key),
            FieldMode::Plaintext => Ok(value.to_owned()),
        }
    }
}
