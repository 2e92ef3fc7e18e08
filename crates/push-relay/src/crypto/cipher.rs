//! AES-256-GCM sealing and opening of individual string fields.
//!
//! A fresh random 96-bit nonce is drawn from the OS CSPRNG for every call.
//! GCM nonce reuse under one key breaks both confidentiality and
//! authentication, so nonces are never derived from the plaintext.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, OsRng},
    Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::{SecretKey, KEY_LEN};

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Smallest decoded size of a well-formed envelope.
pub const MIN_ENVELOPE_LEN: usize = NONCE_LEN + TAG_LEN;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key does not decode to [`KEY_LEN`] bytes.
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The key is not a hexadecimal string.
    #[error("invalid key encoding: expected hexadecimal")]
    InvalidKeyEncoding,

    /// The envelope is not base64 or is shorter than nonce + tag.
    #[error("malformed envelope")]
    MalformedEnvelope,

    /// The tag did not verify, or the verified bytes are not UTF-8.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The AEAD refused to encrypt (input beyond the GCM length limit).
    #[error("seal failed")]
    SealFailed,
}

/// A decoded envelope: nonce plus ciphertext with the tag appended.
///
/// The string representation is `base64(nonce || ciphertext || tag)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext followed by the 16-byte authentication tag.
    pub sealed: Vec<u8>,
}

impl Envelope {
    /// Encode this envelope to its wire representation.
    pub fn to_base64(&self) -> String {
        let mut combined = Vec::with_capacity(NONCE_LEN + self.sealed.len());
        combined.extend_from_slice(&self.nonce);
        combined.extend_from_slice(&self.sealed);
        STANDARD.encode(combined)
    }

    /// Parse a wire envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedEnvelope`] if `s` is not standard padded
    /// base64 or decodes to fewer than [`MIN_ENVELOPE_LEN`] bytes.
    pub fn from_base64(s: &str) -> Result<Self, CipherError> {
        let mut combined = STANDARD
            .decode(s)
            .map_err(|_| CipherError::MalformedEnvelope)?;
        if combined.len() < MIN_ENVELOPE_LEN {
            return Err(CipherError::MalformedEnvelope);
        }
        let sealed = combined.split_off(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&combined);
        Ok(Self { nonce, sealed })
    }
}

/// Seal a plaintext field into a base64 envelope.
///
/// The empty string is returned unchanged.
///
/// # Errors
///
/// Returns [`CipherError::SealFailed`] if the AEAD rejects the input, which is
/// unreachable for message-sized strings.
pub fn seal(plaintext: &str, key: &SecretKey) -> Result<String, CipherError> {
    if plaintext.is_empty() {
        return Ok(String::new());
    }

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let sealed = key
        .cipher()
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|_| CipherError::SealFailed)?;

    Ok(Envelope { nonce, sealed }.to_base64())
}

/// Open a base64 envelope back into its plaintext field.
///
/// The empty string is returned unchanged. Nothing is returned unless the tag
/// verifies.
///
/// # Errors
///
/// Returns [`CipherError::MalformedEnvelope`] for structural failures and
/// [`CipherError::AuthenticationFailed`] for a wrong key, tampered data, or a
/// plaintext that is not UTF-8.
pub fn open(envelope: &str, key: &SecretKey) -> Result<String, CipherError> {
    if envelope.is_empty() {
        return Ok(String::new());
    }

    let parsed = Envelope::from_base64(envelope)?;
    let plaintext = key
        .cipher()
        .decrypt(Nonce::from_slice(&parsed.nonce), parsed.sealed.as_ref())
        .map_err(|_| CipherError::AuthenticationFailed)?;

    String::from_utf8(plaintext).map_err(|_| CipherError::AuthenticationFailed)
}
