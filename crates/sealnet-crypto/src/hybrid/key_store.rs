//! Per-entity key store backed by PEM files.
//!
//! # Layout
//!
//! ```text
//! <keys_base_dir>/
//!   <entity>/
//!     <entity>_private.pem   PKCS#8, unencrypted, mode 0600 on Unix
//!     <entity>_public.pem    SubjectPublicKeyInfo
//! ```
//!
//! # Provisioning
//!
//! Opening a store loads the private key if it exists and otherwise
//! generates a keypair. New key files are written to a temporary file in
//! the entity directory and linked into place without clobbering, so two
//! processes provisioning the same entity at once agree on one keypair:
//! the loser drops its freshly generated pair and loads the winner's.
//!
//! The private key is the source of truth. A missing public key file is
//! rewritten from it; a public key file that still disagrees with it after
//! a few short re-reads is a [`CryptoError::KeyLoad`].

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{CryptoError, CryptoResult};
use crate::format::{private_key_file_name, public_key_file_name};
use crate::hybrid::keys::{load_private_key, load_public_key, KeyPair, PublicKey};
use crate::hybrid::seal::{self, SealedPayload};

/// Re-reads of a mismatched public key before it is reported.
const MISMATCH_RETRIES: u32 = 5;
const MISMATCH_BACKOFF: Duration = Duration::from_millis(20);

#[cfg(unix)]
const PRIVATE_KEY_MODE: u32 = 0o600;
#[cfg(unix)]
const PUBLIC_KEY_MODE: u32 = 0o644;

/// Name and key directory of one logical participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityIdentity {
    name: String,
    dir: PathBuf,
}

impl EntityIdentity {
    /// Create an identity whose key files live directly in `dir`.
    ///
    /// The name becomes part of file names, so it must be non-empty and
    /// free of path separators.
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> CryptoResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CryptoError::InvalidInput(
                "Entity name cannot be empty".to_string(),
            ));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(CryptoError::InvalidInput(format!(
                "Entity name must not contain path components: {}",
                name
            )));
        }
        Ok(Self {
            name,
            dir: dir.into(),
        })
    }

    /// Create an identity under a shared base directory: `<base>/<name>/`.
    pub fn in_base(base: &Path, name: impl Into<String>) -> CryptoResult<Self> {
        let name = name.into();
        let dir = base.join(&name);
        Self::new(name, dir)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn private_key_path(&self) -> PathBuf {
        self.dir.join(private_key_file_name(&self.name))
    }

    pub fn public_key_path(&self) -> PathBuf {
        self.dir.join(public_key_file_name(&self.name))
    }
}

/// An entity's loaded keypair.
///
/// Construction is the only step that touches disk. Afterwards the store is
/// read-only and can be shared across threads behind an `Arc`.
pub struct KeyStore {
    identity: EntityIdentity,
    keys: KeyPair,
    public_pem: String,
    fingerprint: String,
}

impl KeyStore {
    /// Load or provision the keypair of `name` in `dir`.
    pub fn open(name: impl Into<String>, dir: impl Into<PathBuf>) -> CryptoResult<Self> {
        Self::from_identity(EntityIdentity::new(name, dir)?)
    }

    /// Load or provision the keypair of `name` in `<base>/<name>/`.
    pub fn open_in_base(base: &Path, name: impl Into<String>) -> CryptoResult<Self> {
        Self::from_identity(EntityIdentity::in_base(base, name)?)
    }

    /// Load or provision the keypair of an identity.
    pub fn from_identity(identity: EntityIdentity) -> CryptoResult<Self> {
        fs::create_dir_all(identity.dir())?;

        let (keys, generated) = match load_existing(&identity, false)? {
            Some(keys) => (keys, false),
            None => provision(&identity)?,
        };

        let public_pem = keys.public.to_pem()?;
        let fingerprint = keys.public.fingerprint()?;

        if generated {
            info!(
                entity = %identity.name(),
                key_fingerprint = %fingerprint,
                key_dir = %identity.dir().display(),
                "Generated new keys (private key stored unencrypted)"
            );
        } else {
            info!(
                entity = %identity.name(),
                key_fingerprint = %fingerprint,
                "Loaded existing keys"
            );
        }

        Ok(Self {
            identity,
            keys,
            public_pem,
            fingerprint,
        })
    }

    /// Entity name.
    pub fn name(&self) -> &str {
        self.identity.name()
    }

    /// Directory holding this entity's key files.
    pub fn key_dir(&self) -> &Path {
        self.identity.dir()
    }

    pub fn identity(&self) -> &EntityIdentity {
        &self.identity
    }

    /// Hex SHA-256 fingerprint of the public key.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.keys
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keys.public
    }

    /// The entity's public key as PEM, ready to publish.
    pub fn public_key_pem(&self) -> &str {
        &self.public_pem
    }

    /// Seal `message` for the holder of `recipient_public_key_pem`.
    ///
    /// Returns the JSON-serialized [`SealedPayload`].
    pub fn encrypt_for(&self, message: &str, recipient_public_key_pem: &str) -> CryptoResult<String> {
        let recipient = PublicKey::from_pem(recipient_public_key_pem)?;
        seal::encrypt(message.as_bytes(), &recipient)?.to_json()
    }

    /// Open a JSON-serialized [`SealedPayload`] addressed to this entity.
    pub fn decrypt(&self, sealed_json: &str) -> CryptoResult<String> {
        let sealed = SealedPayload::from_json(sealed_json)?;
        let plaintext = seal::decrypt(&sealed, &self.keys.private)?;
        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Format("Decrypted payload is not UTF-8".to_string()))
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("entity", &self.identity.name())
            .field("dir", &self.identity.dir())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

/// Load the entity's keypair if its private key file exists.
///
/// With `repair_public` set, the public key file is rewritten from the
/// private key unconditionally instead of being checked.
fn load_existing(identity: &EntityIdentity, repair_public: bool) -> CryptoResult<Option<KeyPair>> {
    let private = match load_private_key(&identity.private_key_path()) {
        Ok(key) => key,
        Err(CryptoError::Io(e)) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let keys = KeyPair::from_private(private);

    if repair_public {
        write_public_key(identity, &keys.public)?;
    } else {
        reconcile_public_key(identity, &keys.public)?;
    }

    Ok(Some(keys))
}

fn reconcile_public_key(identity: &EntityIdentity, expected: &PublicKey) -> CryptoResult<()> {
    let path = identity.public_key_path();
    let mut attempt = 0;
    loop {
        match load_public_key(&path) {
            Ok(on_disk) if &on_disk == expected => return Ok(()),
            // A provisioner that lost the race may still be repairing the file.
            Ok(_) if attempt < MISMATCH_RETRIES => {
                attempt += 1;
                debug!(
                    entity = %identity.name(),
                    attempt,
                    "Public key does not match yet, re-reading"
                );
                thread::sleep(MISMATCH_BACKOFF);
            }
            Ok(_) => {
                return Err(CryptoError::KeyLoad {
                    path,
                    reason: "public key does not match private key".to_string(),
                })
            }
            Err(CryptoError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    entity = %identity.name(),
                    "Public key file missing, rewriting from private key"
                );
                return write_public_key(identity, expected);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Generate a keypair and publish it. Returns the keys and whether they
/// were generated by this call.
fn provision(identity: &EntityIdentity) -> CryptoResult<(KeyPair, bool)> {
    let generated = KeyPair::generate()?;
    let private_pem = generated.private.to_pem()?;

    // The public key goes first so the private key never appears next to a
    // stale public file.
    write_public_key(identity, &generated.public)?;

    let published = publish_new(
        identity.dir(),
        &identity.private_key_path(),
        private_pem.as_bytes(),
    )?;

    if published {
        // A concurrent provisioner may have written its own public key over ours.
        write_public_key(identity, &generated.public)?;
        return Ok((generated, true));
    }

    debug!(
        entity = %identity.name(),
        "Private key appeared during provisioning, loading it instead"
    );
    let keys = load_existing(identity, true)?.ok_or_else(|| CryptoError::KeyLoad {
        path: identity.private_key_path(),
        reason: "private key disappeared during provisioning".to_string(),
    })?;
    Ok((keys, false))
}

fn write_public_key(identity: &EntityIdentity, public: &PublicKey) -> CryptoResult<()> {
    let pem = public.to_pem()?;
    let tmp = write_temp(identity.dir(), pem.as_bytes(), false)?;
    tmp.persist(identity.public_key_path())
        .map_err(|e| CryptoError::Io(e.error))?;
    Ok(())
}

/// Link `contents` into place at `path` unless the file already exists.
/// Returns `false` if another writer got there first.
fn publish_new(dir: &Path, path: &Path, contents: &[u8]) -> CryptoResult<bool> {
    let tmp = write_temp(dir, contents, true)?;
    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(CryptoError::Io(e.error)),
    }
}

fn write_temp(dir: &Path, contents: &[u8], secret: bool) -> CryptoResult<tempfile::NamedTempFile> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".sealnet-key-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = if secret {
            PRIVATE_KEY_MODE
        } else {
            PUBLIC_KEY_MODE
        };
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = secret;

    tmp.as_file().sync_all()?;
    Ok(tmp)
}
