//! Shared encoding helpers and key file naming.

use base64::Engine;

use crate::error::{CryptoError, CryptoResult};

/// File extension of PEM key files.
pub const PEM_EXTENSION: &str = "pem";

/// Suffix of an entity's private key file (`<name>_private.pem`).
pub const PRIVATE_KEY_SUFFIX: &str = "_private";

/// Suffix of an entity's public key file (`<name>_public.pem`).
pub const PUBLIC_KEY_SUFFIX: &str = "_public";

/// Private key file name for an entity.
pub fn private_key_file_name(entity: &str) -> String {
    format!("{entity}{PRIVATE_KEY_SUFFIX}.{PEM_EXTENSION}")
}

/// Public key file name for an entity.
pub fn public_key_file_name(entity: &str) -> String {
    format!("{entity}{PUBLIC_KEY_SUFFIX}.{PEM_EXTENSION}")
}

/// Encode bytes as standard base64.
pub fn base64_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Decode a standard base64 string to bytes.
pub fn base64_decode(data: &str) -> CryptoResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| CryptoError::Format(format!("Invalid base64: {}", e)))
}
