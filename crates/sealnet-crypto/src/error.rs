//! Error types for cryptographic operations.

use std::path::PathBuf;

use thiserror::Error;

/// Cryptographic operation errors.
///
/// `KeyLoad` and `KeyGeneration` are fatal to the owning process; every
/// other variant is recoverable by the caller.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key files are present but cannot be parsed or disagree.
    #[error("Failed to load key from {}: {reason}", path.display())]
    KeyLoad { path: PathBuf, reason: String },

    /// Key generation failed (entropy or library failure).
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed.
    ///
    /// Wrong key, tampered data and malformed sealed payloads all land
    /// here with the same message.
    #[error("Decryption failed")]
    Decryption,

    /// Malformed PEM or JSON input.
    #[error("Invalid format: {0}")]
    Format(String),

    /// Envelope is missing what the requested operation needs.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CryptoError {
    /// Whether the error should stop the process rather than be reported
    /// back to a peer.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::KeyLoad { .. } | Self::KeyGeneration(_))
    }
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_display_has_no_detail() {
        let err = CryptoError::Decryption;
        assert_eq!(err.to_string(), "Decryption failed");
    }

    #[test]
    fn test_key_load_display() {
        let err = CryptoError::KeyLoad {
            path: PathBuf::from("keys/alice/alice_private.pem"),
            reason: "not PEM".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("alice_private.pem"));
        assert!(msg.contains("not PEM"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(CryptoError::KeyGeneration("rng".into()).is_fatal());
        assert!(CryptoError::KeyLoad {
            path: PathBuf::from("x"),
            reason: "y".into()
        }
        .is_fatal());
        assert!(!CryptoError::Decryption.is_fatal());
        assert!(!CryptoError::Protocol("not encrypted".into()).is_fatal());
        assert!(!CryptoError::Format("bad pem".into()).is_fatal());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let crypto_err: CryptoError = io_err.into();
        assert!(matches!(crypto_err, CryptoError::Io(_)));
    }
}
