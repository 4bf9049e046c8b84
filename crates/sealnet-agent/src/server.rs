//! Tool dispatch for the document verification server.
//!
//! Every call except `get_server_public_key` names the requester's public
//! key and may ask for a sealed reply with `"encrypted": true`. The
//! arguments themselves may also arrive sealed for this server; they are
//! opened before dispatch, the reply is then sealed unless the inner
//! arguments say otherwise, and the envelope's sender key serves as the
//! requester key when none is given.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use sealnet_crypto::{envelope, is_sealed, AccessPolicy, CryptoError, Envelope, KeyStore};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::documents::DocumentRegistry;
use crate::error::{AgentError, AgentResult};
use crate::summarize::{LeadSentenceSummarizer, Summarizer, DEFAULT_MAX_SENTENCES};
use crate::tools::{
    descriptors, ToolDescriptor, GET_SERVER_PUBLIC_KEY, LIST_DOCUMENTS, SUMMARIZE_TEXT,
    VERIFY_DOCUMENT,
};

/// Arguments of one call after any sealed request has been opened.
struct CallArgs<'a> {
    args: Cow<'a, Value>,
    sealed_request: bool,
    sender_public_key: Option<String>,
}

impl CallArgs<'_> {
    fn str_arg(&self, name: &str) -> AgentResult<&str> {
        self.args
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AgentError::MissingArgument(name.to_string()))
    }

    fn requester_key(&self) -> AgentResult<&str> {
        match self.str_arg("requester_public_key") {
            Ok(key) => Ok(key),
            Err(e) => self.sender_public_key.as_deref().ok_or(e),
        }
    }

    /// Sealed requests get sealed replies unless they opt out.
    fn wants_encrypted_reply(&self) -> bool {
        self.args
            .get("encrypted")
            .and_then(Value::as_bool)
            .unwrap_or(self.sealed_request)
    }
}

/// Serves the document tools with one server identity.
pub struct ToolServer {
    store: Arc<KeyStore>,
    registry: DocumentRegistry,
    policy: AccessPolicy,
    summarizer: Box<dyn Summarizer>,
    server_id: String,
}

impl ToolServer {
    /// Server with the seeded registry and the local summarizer.
    ///
    /// The server id defaults to the key store's entity name.
    pub fn new(store: Arc<KeyStore>, policy: AccessPolicy) -> Self {
        let server_id = store.name().to_string();
        Self {
            store,
            registry: DocumentRegistry::seeded(),
            policy,
            summarizer: Box::new(LeadSentenceSummarizer),
            server_id,
        }
    }

    pub fn with_registry(mut self, registry: DocumentRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = server_id.into();
        self
    }

    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    pub fn key_store(&self) -> &KeyStore {
        &self.store
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        descriptors()
    }

    /// Run a tool. Failures come back as
    /// `{"error": ..., "tool": ..., "success": false}`.
    pub fn call_tool(&self, name: &str, arguments: &Value) -> Value {
        let started = Instant::now();
        let result = self.dispatch(name, arguments);
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(value) => {
                debug!(tool = %name, duration_ms, success = true, "Tool call finished");
                value
            }
            Err(e) => {
                warn!(tool = %name, duration_ms, error = %e, "Tool call failed");
                json!({
                    "error": e.public_message(),
                    "tool": name,
                    "success": false
                })
            }
        }
    }

    fn dispatch(&self, name: &str, arguments: &Value) -> AgentResult<Value> {
        if name == GET_SERVER_PUBLIC_KEY {
            return Ok(self.get_server_public_key());
        }

        let call = self.open_arguments(arguments)?;
        match name {
            VERIFY_DOCUMENT => self.verify_document(&call),
            LIST_DOCUMENTS => self.list_documents(&call),
            SUMMARIZE_TEXT => self.summarize_text(&call),
            other => Err(AgentError::UnknownTool(other.to_string())),
        }
    }

    fn open_arguments<'a>(&self, arguments: &'a Value) -> AgentResult<CallArgs<'a>> {
        if !is_sealed(arguments) {
            return Ok(CallArgs {
                args: Cow::Borrowed(arguments),
                sealed_request: false,
                sender_public_key: None,
            });
        }

        let sealed = Envelope::from_value(arguments)?;
        let opened = envelope::open(&sealed, &self.store)?;
        if !opened.is_object() {
            return Err(AgentError::InvalidArgument(
                "sealed arguments must be a JSON object".to_string(),
            ));
        }
        debug!(entity = %self.store.name(), "Opened sealed request");

        Ok(CallArgs {
            args: Cow::Owned(opened),
            sealed_request: true,
            sender_public_key: sealed.sender_public_key,
        })
    }

    fn reply(&self, call: &CallArgs<'_>, data: Value) -> AgentResult<Value> {
        let requester_key = call.requester_key()?;
        Ok(envelope::respond(
            data,
            call.wants_encrypted_reply(),
            requester_key,
            &self.store,
        )?)
    }

    fn get_server_public_key(&self) -> Value {
        json!({
            "server_public_key": self.store.public_key_pem(),
            "server_id": self.server_id,
            "key_fingerprint": self.store.fingerprint()
        })
    }

    fn verify_document(&self, call: &CallArgs<'_>) -> AgentResult<Value> {
        let document_id = call.str_arg("document_id")?;
        call.requester_key()?;

        let result = self.registry.verify(document_id);
        if result.verification_successful {
            info!(document_id = %document_id, status = %result.status, "Document found");
        } else {
            warn!(document_id = %document_id, "Document not found");
        }

        let data = serde_json::to_value(result).map_err(CryptoError::from)?;
        self.reply(call, data)
    }

    fn list_documents(&self, call: &CallArgs<'_>) -> AgentResult<Value> {
        call.requester_key()?;

        let documents = self.registry.list();
        let total_count = documents.len();
        info!(total_count, "Document list request");

        self.reply(
            call,
            json!({
                "documents": documents,
                "total_count": total_count
            }),
        )
    }

    fn summarize_text(&self, call: &CallArgs<'_>) -> AgentResult<Value> {
        let access_key = call.str_arg("access_key")?;
        if !self.policy.is_authorized(access_key) {
            warn!(tool = SUMMARIZE_TEXT, "Rejected access key");
            return Err(AgentError::AccessDenied);
        }

        let text = call.str_arg("text")?;
        call.requester_key()?;
        let max_sentences = match call.args.get("max_sentences") {
            None | Some(Value::Null) => DEFAULT_MAX_SENTENCES,
            Some(v) => v
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| {
                    AgentError::InvalidArgument("max_sentences must be a positive integer".into())
                })?,
        };

        let summary = self.summarizer.summarize(text, max_sentences)?;
        debug!(backend = %self.summarizer.name(), "Summary produced");

        let mut data = Map::new();
        data.insert("original_length".into(), json!(text.chars().count()));
        data.insert("summary_length".into(), json!(summary.chars().count()));
        data.insert("summary".into(), Value::String(summary));
        data.insert("success".into(), Value::Bool(true));

        self.reply(call, Value::Object(data))
    }
}
