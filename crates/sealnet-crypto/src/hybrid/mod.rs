//! Hybrid public-key encryption between named entities.
//!
//! Every entity owns a long-lived RSA keypair and publishes the public half
//! as PEM. A sender seals a message by encrypting it with a one-time
//! AES-256-GCM key and wrapping that key with RSA-OAEP under the
//! recipient's public key.
//!
//! # Security Model
//!
//! - **RSA-2048 / OAEP-SHA256** - Content key wrapping
//! - **AES-256-GCM** - Authenticated content encryption
//! - **Fresh key and nonce per message** - No nonce reuse across messages
//! - **No forward secrecy** - A leaked private key opens past traffic
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use sealnet_crypto::hybrid::KeyStore;
//!
//! let alice = KeyStore::open("alice", "keys/alice").unwrap();
//! let bob = KeyStore::open("bob", "keys/bob").unwrap();
//!
//! let sealed = alice.encrypt_for("hello bob", bob.public_key_pem()).unwrap();
//! assert_eq!(bob.decrypt(&sealed).unwrap(), "hello bob");
//! ```

pub mod key_store;
pub mod keys;
pub mod seal;

// Re-export commonly used types
pub use key_store::{EntityIdentity, KeyStore};
pub use keys::{load_private_key, load_public_key, KeyPair, PrivateKey, PublicKey, KEY_BITS};
pub use seal::{decrypt, encrypt, SealedPayload};

/// Keypairs shared across unit tests; RSA generation is too slow to
/// repeat per test.
#[cfg(test)]
pub(crate) mod test_keys {
    use std::sync::OnceLock;

    use super::KeyPair;

    fn cached(cell: &'static OnceLock<KeyPair>) -> &'static KeyPair {
        cell.get_or_init(|| KeyPair::generate().unwrap())
    }

    pub fn alice() -> &'static KeyPair {
        static KEY: OnceLock<KeyPair> = OnceLock::new();
        cached(&KEY)
    }

    pub fn bob() -> &'static KeyPair {
        static KEY: OnceLock<KeyPair> = OnceLock::new();
        cached(&KEY)
    }

    pub fn mallory() -> &'static KeyPair {
        static KEY: OnceLock<KeyPair> = OnceLock::new();
        cached(&KEY)
    }
}
