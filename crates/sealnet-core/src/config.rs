//! Runtime configuration for sealnet agents.
//!
//! Configuration is read from environment variables (`SEALNET_*` prefixed).
//! Binaries load a `.env` file with `dotenvy` before calling
//! [`SealnetConfig::from_env`].
//!
//! # Example
//!
//! ```rust
//! use sealnet_core::config::SealnetConfig;
//!
//! let config = SealnetConfig::from_env();
//! let server_keys = config.entity_key_dir(&config.server_id);
//! assert!(server_keys.ends_with(&config.server_id));
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Default base directory for per-entity key directories.
pub const DEFAULT_KEYS_BASE_DIR: &str = "keys";

/// Default access-key allow-list.
pub const DEFAULT_VALID_ACCESS_KEYS: &str = "DOC001,SECRETKEY123,SUMMARY_ACCESS_777";

/// Default identity of the document verification server.
pub const DEFAULT_SERVER_ID: &str = "document_verification_server";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level sealnet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealnetConfig {
    /// Directory holding one sub-directory of PEM files per entity.
    pub keys_base_dir: PathBuf,
    /// Credentials accepted by the access policy.
    pub valid_access_keys: Vec<String>,
    /// Entity name of the tool server.
    pub server_id: String,
}

impl Default for SealnetConfig {
    fn default() -> Self {
        Self {
            keys_base_dir: PathBuf::from(DEFAULT_KEYS_BASE_DIR),
            valid_access_keys: parse_key_list(DEFAULT_VALID_ACCESS_KEYS),
            server_id: DEFAULT_SERVER_ID.to_string(),
        }
    }
}

impl SealnetConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let keys_base_dir = lookup("SEALNET_KEYS_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KEYS_BASE_DIR));

        let valid_access_keys = parse_key_list(
            &lookup("SEALNET_VALID_ACCESS_KEYS")
                .unwrap_or_else(|| DEFAULT_VALID_ACCESS_KEYS.to_string()),
        );

        let server_id =
            lookup("SEALNET_SERVER_ID").unwrap_or_else(|| DEFAULT_SERVER_ID.to_string());

        debug!(
            keys_base_dir = %keys_base_dir.display(),
            access_key_count = valid_access_keys.len(),
            server_id = %server_id,
            "Configuration loaded"
        );

        Self {
            keys_base_dir,
            valid_access_keys,
            server_id,
        }
    }

    /// Key directory for a named entity: `<keys_base_dir>/<name>`.
    pub fn entity_key_dir(&self, name: &str) -> PathBuf {
        self.keys_base_dir.join(name)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.valid_access_keys.is_empty() {
            return Err(ConfigError::Validation(
                "at least one access key must be configured".to_string(),
            ));
        }
        if self.server_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server_id cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks.
fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
