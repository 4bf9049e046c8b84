//! # sealnet-crypto
//!
//! Hybrid encryption for JSON messages exchanged between sealnet agents.
//!
//! Each agent owns a long-lived RSA keypair in a [`KeyStore`] and publishes
//! its public key. Messages are sealed with a one-time AES-256-GCM key that
//! is itself wrapped with RSA-OAEP under the recipient's public key, then
//! carried in an [`Envelope`] that also names the sender's public key for
//! the reply.
//!
//! ## Cryptographic Primitives
//!
//! - **Key wrapping**: RSA-2048, OAEP with SHA-256 (hash and MGF1)
//! - **Symmetric cipher**: AES-256-GCM (AEAD), 96-bit random nonce
//! - **Key encoding**: PEM (PKCS#8 private, SubjectPublicKeyInfo public)
//! - **Random generation**: OS-seeded thread CSPRNG
//!
//! ## Wire Format
//!
//! ```text
//! Envelope       {"encrypted": true, "payload": "<SealedPayload JSON>",
//!                 "sender_public_key": "<PEM>"}
//! SealedPayload  {"encrypted_aes_key": "<b64>", "nonce": "<b64>",
//!                 "ciphertext": "<b64>"}
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use sealnet_crypto::{envelope, KeyStore};
//! use serde_json::json;
//!
//! let alice = KeyStore::open_in_base("keys".as_ref(), "alice").unwrap();
//! let bob = KeyStore::open_in_base("keys".as_ref(), "bob").unwrap();
//!
//! let sealed = envelope::seal(&json!({"msg": "hi"}), bob.public_key_pem(), &alice).unwrap();
//! let opened = envelope::open(&sealed, &bob).unwrap();
//! assert_eq!(opened, json!({"msg": "hi"}));
//! ```

pub mod access;
pub mod cipher;
pub mod detect;
pub mod envelope;
pub mod error;
pub mod format;
pub mod hybrid;

// Re-export commonly used types
pub use access::{generate_access_key, is_authorized, AccessPolicy};
pub use detect::{detect_envelope, is_sealed, EnvelopeKind};
pub use envelope::{open, plain, respond, seal, unwrap_reply, Envelope};
pub use error::{CryptoError, CryptoResult};
pub use format::{base64_decode, base64_encode};
pub use hybrid::{EntityIdentity, KeyPair, KeyStore, PrivateKey, PublicKey, SealedPayload};
