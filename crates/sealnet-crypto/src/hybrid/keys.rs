//! RSA keypairs and their PEM encodings.
//!
//! This module provides:
//! - Keypair generation (2048-bit modulus, exponent 65537)
//! - PEM marshalling: SubjectPublicKeyInfo for public keys, unencrypted
//!   PKCS#8 for private keys
//! - Key file loading for the key store
//!
//! # Security
//!
//! - Private key material is zeroized on drop
//! - Private key files are NOT encrypted at rest; protect the key directory
//! - Random number generation uses the OS-seeded thread CSPRNG

use std::path::Path;

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// RSA modulus size for generated keys.
pub const KEY_BITS: usize = 2048;

/// RSA public key.
///
/// Public keys are freely shared; senders use them to seal messages only
/// the matching private key can open.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    /// Encode as a SubjectPublicKeyInfo PEM string.
    pub fn to_pem(&self) -> CryptoResult<String> {
        self.0
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::Format(format!("Public key encoding failed: {}", e)))
    }

    /// Parse a SubjectPublicKeyInfo PEM string.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        RsaPublicKey::from_public_key_pem(pem.trim())
            .map(Self)
            .map_err(|e| CryptoError::Format(format!("Invalid public key PEM: {}", e)))
    }

    /// Hex SHA-256 of the DER encoding; a stable short identity for logs.
    pub fn fingerprint(&self) -> CryptoResult<String> {
        let der = self
            .0
            .to_public_key_der()
            .map_err(|e| CryptoError::Format(format!("Public key encoding failed: {}", e)))?;
        Ok(hex::encode(Sha256::digest(der.as_bytes())))
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.0.size() * 8
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fingerprint = self.fingerprint().unwrap_or_default();
        write!(f, "PublicKey({})", &fingerprint[..fingerprint.len().min(16)])
    }
}

/// RSA private key. Never leaves its owning entity.
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

impl PrivateKey {
    /// Encode as an unencrypted PKCS#8 PEM string.
    pub fn to_pem(&self) -> CryptoResult<Zeroizing<String>> {
        self.0
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| CryptoError::Format(format!("Private key encoding failed: {}", e)))
    }

    /// Parse an unencrypted PKCS#8 PEM string.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        RsaPrivateKey::from_pkcs8_pem(pem.trim())
            .map(Self)
            .map_err(|e| CryptoError::Format(format!("Invalid private key PEM: {}", e)))
    }

    /// Derive the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.to_public_key())
    }

    pub(crate) fn as_rsa(&self) -> &RsaPrivateKey {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// RSA keypair. `public` always corresponds to `private`.
#[derive(Clone)]
pub struct KeyPair {
    /// The public key (can be shared).
    pub public: PublicKey,
    /// The private key (must be kept secret).
    pub private: PrivateKey,
}

impl KeyPair {
    /// Generate a new random keypair.
    ///
    /// Failure means the entropy source or bignum library is broken and is
    /// not worth retrying.
    pub fn generate() -> CryptoResult<Self> {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, KEY_BITS)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;

        Ok(Self::from_private(PrivateKey(private)))
    }

    /// Create a keypair from an existing private key.
    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { public, private }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &"[REDACTED]")
            .finish()
    }
}

/// Load a private key PEM file.
///
/// A missing file surfaces as [`CryptoError::Io`] with `NotFound`; a file
/// that exists but does not parse is a [`CryptoError::KeyLoad`].
pub fn load_private_key(path: &Path) -> CryptoResult<PrivateKey> {
    let contents = Zeroizing::new(std::fs::read_to_string(path)?);
    PrivateKey::from_pem(&contents).map_err(|e| CryptoError::KeyLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load a public key PEM file. Errors mirror [`load_private_key`].
pub fn load_public_key(path: &Path) -> CryptoResult<PublicKey> {
    let contents = std::fs::read_to_string(path)?;
    PublicKey::from_pem(&contents).map_err(|e| CryptoError::KeyLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
