//! [`SecretKey`]: the process-wide 256-bit field encryption key.

use aes_gcm::{Aes256Gcm, Key, KeyInit};
use zeroize::Zeroizing;

use super::cipher::CipherError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Fixed-size key buffer holding exactly [`KEY_LEN`] bytes.
///
/// Constructed once at startup and shared read-only behind an `Arc`. The bytes
/// are overwritten with zeroes when the key is dropped.
pub struct SecretKey(Zeroizing<[u8; KEY_LEN]>);

impl SecretKey {
    /// Build a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Decode a key from its hexadecimal form (64 hex characters).
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyEncoding`] if `hex_key` is not valid hex
    /// and [`CipherError::InvalidKeyLength`] if it does not decode to
    /// [`KEY_LEN`] bytes.
    pub fn from_hex(hex_key: &str) -> Result<Self, CipherError> {
        let decoded = Zeroizing::new(
            hex::decode(hex_key.trim()).map_err(|_| CipherError::InvalidKeyEncoding)?,
        );
        if decoded.len() != KEY_LEN {
            return Err(CipherError::InvalidKeyLength(decoded.len()));
        }
        let mut key = Self::from_bytes([0u8; KEY_LEN]);
        key.0.copy_from_slice(&decoded);
        Ok(key)
    }

    pub(crate) fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0[..]))
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("SecretKey([REDACTED])")
    }
}
