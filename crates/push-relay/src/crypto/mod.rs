//! AES-256-GCM field envelopes.
//!
//! This module is intentionally free of HTTP and collaborator dependencies. It
//! provides the key type, the `seal`/`open` primitives, and the per-mode field
//! codec used by the relay layer.
//!
//! # Envelope format
//!
//! ```text
//! base64( nonce[12] || ciphertext[N] || tag[16] )
//! ```
//!
//! Standard alphabet with padding. The empty string is never wrapped: it seals
//! and opens to itself.

pub mod cipher;
pub mod codec;
pub mod key;

pub use cipher::{open, seal, CipherError};
pub use codec::{FieldCodec, FieldMode};
pub use key::{SecretKey, KEY_LEN};
