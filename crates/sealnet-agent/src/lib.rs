//! # sealnet-agent
//!
//! Document verification and summarization tools served between two
//! entities, with requests and replies optionally sealed by
//! [`sealnet_crypto`].
//!
//! The [`ToolServer`] owns the server identity, the [`DocumentRegistry`] and
//! the [`AccessPolicy`](sealnet_crypto::AccessPolicy) guarding
//! `summarize_text`. An [`AgentClient`] builds requests and reads replies for
//! the other side. [`rpc`] frames both as line-delimited JSON.

pub mod client;
pub mod documents;
pub mod error;
pub mod rpc;
pub mod server;
pub mod summarize;
pub mod tools;

pub use client::AgentClient;
pub use documents::{DocumentRecord, DocumentRegistry, DocumentStatus, VerificationResult};
pub use error::{AgentError, AgentResult, GENERIC_FAILURE};
pub use rpc::{handle_line, RpcRequest, RpcResponse};
pub use server::ToolServer;
pub use summarize::{LeadSentenceSummarizer, Summarizer};
pub use tools::ToolDescriptor;
