//! Structured logging and optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - **No message fields, push tokens, or key material** may appear in any span
//!   attribute or log field. Errors are logged through their `Display` output,
//!   which never carries field values.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridden by
//!   `RUST_LOG` when set.

pub mod init;

pub use init::init_telemetry;
