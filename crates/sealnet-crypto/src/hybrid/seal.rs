//! Hybrid encryption: AES-256-GCM content, RSA-OAEP wrapped key.
//!
//! # Encryption Flow
//!
//! 1. Generate a random 256-bit content key and 96-bit nonce
//! 2. Encrypt the plaintext with AES-256-GCM (no associated data)
//! 3. Wrap the content key with RSA-OAEP (SHA-256 hash and MGF1) under the
//!    recipient's public key
//! 4. Base64 the three parts into a [`SealedPayload`]
//!
//! # Decryption Flow
//!
//! 1. Decode the three base64 fields
//! 2. Unwrap the content key with the private key
//! 3. Decrypt and authenticate the ciphertext
//!
//! Every decryption failure is reported as [`CryptoError::Decryption`]
//! without saying which step failed.

use rsa::Oaep;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::trace;

use crate::cipher::{aes_gcm_decrypt, aes_gcm_encrypt, generate_nonce, ContentKey, NONCE_LEN};
use crate::error::{CryptoError, CryptoResult};
use crate::format::{base64_decode, base64_encode};
use crate::hybrid::keys::{PrivateKey, PublicKey};

/// Wire form of one sealed message.
///
/// Serialized as `{"encrypted_aes_key": "<b64>", "nonce": "<b64>",
/// "ciphertext": "<b64>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedPayload {
    /// Content key wrapped with RSA-OAEP.
    pub encrypted_aes_key: String,
    /// 12-byte AES-GCM nonce.
    pub nonce: String,
    /// AES-GCM ciphertext with trailing tag.
    pub ciphertext: String,
}

impl SealedPayload {
    /// Serialize to the JSON string carried in an envelope's `payload`.
    pub fn to_json(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the JSON string form. Malformed input is a decryption failure.
    pub fn from_json(json: &str) -> CryptoResult<Self> {
        serde_json::from_str(json).map_err(|_| CryptoError::Decryption)
    }
}

fn oaep() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Seal `plaintext` so only the holder of `recipient`'s private key can
/// open it.
///
/// Output is never repeated: each call draws a new content key and nonce.
pub fn encrypt(plaintext: &[u8], recipient: &PublicKey) -> CryptoResult<SealedPayload> {
    let content_key = ContentKey::generate();
    let nonce = generate_nonce();

    let ciphertext = aes_gcm_encrypt(&content_key, &nonce, plaintext)?;

    let mut rng = rand::thread_rng();
    let wrapped_key = recipient
        .as_rsa()
        .encrypt(&mut rng, oaep(), content_key.as_bytes())
        .map_err(|e| CryptoError::Encryption(format!("Key wrap failed: {}", e)))?;

    trace!(
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "Sealed payload"
    );

    Ok(SealedPayload {
        encrypted_aes_key: base64_encode(&wrapped_key),
        nonce: base64_encode(&nonce),
        ciphertext: base64_encode(&ciphertext),
    })
}

/// Open a sealed payload with the recipient's private key.
pub fn decrypt(sealed: &SealedPayload, private_key: &PrivateKey) -> CryptoResult<Vec<u8>> {
    let wrapped_key =
        base64_decode(&sealed.encrypted_aes_key).map_err(|_| CryptoError::Decryption)?;
    let nonce: [u8; NONCE_LEN] = base64_decode(&sealed.nonce)
        .ok()
        .and_then(|n| n.try_into().ok())
        .ok_or(CryptoError::Decryption)?;
    let ciphertext = base64_decode(&sealed.ciphertext).map_err(|_| CryptoError::Decryption)?;

    let key_bytes = zeroize::Zeroizing::new(
        private_key
            .as_rsa()
            .decrypt(oaep(), &wrapped_key)
            .map_err(|_| CryptoError::Decryption)?,
    );
    let content_key = ContentKey::from_slice(&key_bytes).ok_or(CryptoError::Decryption)?;

    aes_gcm_decrypt(&content_key, &nonce, &ciphertext)
}
