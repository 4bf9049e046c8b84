//! Structured logging field names and subscriber setup for sealnet.
//!
//! The constants name the structured fields that sealnet events carry.
//! `tracing` macros spell field names literally, so the constants serve log
//! consumers and tests that inspect emitted events.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Fatal key-store failures, requires operator attention |
//! | WARN  | Recoverable issue (rejected credential, failed decryption) |
//! | INFO  | Lifecycle events (key loaded/generated, server start) |
//! | DEBUG | Decision points (sealed vs plaintext reply) |
//! | TRACE | Per-message detail |
//!
//! Key material and decrypted plaintext are never logged.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Entity (key owner) name.
pub const ENTITY: &str = "entity";

/// Hex SHA-256 fingerprint of a DER-encoded public key.
pub const KEY_FINGERPRINT: &str = "key_fingerprint";

/// Tool name being dispatched.
pub const TOOL: &str = "tool";

/// Document identifier being verified.
pub const DOCUMENT_ID: &str = "document_id";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether a payload travelled sealed.
pub const ENCRYPTED: &str = "encrypted";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Initialize the global tracing subscriber.
///
/// Environment variables:
///   RUST_LOG    - standard env filter (falls back to `default_filter`)
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_ANSI    - "true"/"false" override ANSI colors
///
/// Output goes to stderr so stdout stays free for protocol traffic.
/// Calling this more than once is a no-op.
pub fn init_tracing(default_filter: &str) {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        if let Some(ansi) = log_ansi {
            layer = layer.with_ansi(ansi);
        }
        registry.with(layer).try_init()
    };

    if result.is_ok() {
        tracing::debug!(log_format = %log_format, "Logging initialized");
    }
}
