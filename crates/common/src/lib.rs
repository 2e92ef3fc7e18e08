//! Common types, protocol definitions, and errors shared across `push-relay` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
