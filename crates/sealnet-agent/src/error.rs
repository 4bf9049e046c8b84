//! Error types for tool dispatch.

use sealnet_crypto::CryptoError;
use thiserror::Error;

/// Message returned to peers for any cryptographic failure.
pub const GENERIC_FAILURE: &str = "request could not be processed";

/// Tool dispatch errors.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Access denied")]
    AccessDenied,

    /// A failure reported by the remote side of a call.
    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Server public key not known yet")]
    ServerKeyUnknown,

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl AgentError {
    /// Text safe to send back to a peer.
    ///
    /// Cryptographic failures collapse to [`GENERIC_FAILURE`] so replies do
    /// not reveal which check failed.
    pub fn public_message(&self) -> String {
        match self {
            Self::Crypto(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
