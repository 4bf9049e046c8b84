//! Requesting side of the tool protocol.
//!
//! The client builds tool arguments that name its own public key, learns
//! the server's key from `get_server_public_key`, and reads replies that may
//! come back sealed for it.

use std::sync::Arc;

use sealnet_crypto::{envelope, KeyStore};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{AgentError, AgentResult};

/// One entity calling tools on a document server.
#[derive(Debug, Clone)]
pub struct AgentClient {
    store: Arc<KeyStore>,
    server_public_key: Option<String>,
}

impl AgentClient {
    pub fn new(store: Arc<KeyStore>) -> Self {
        Self {
            store,
            server_public_key: None,
        }
    }

    pub fn key_store(&self) -> &KeyStore {
        &self.store
    }

    pub fn server_public_key(&self) -> Option<&str> {
        self.server_public_key.as_deref()
    }

    /// Remember the server key from a `get_server_public_key` reply.
    pub fn learn_server_key(&mut self, reply: &Value) -> AgentResult<&str> {
        let key = reply
            .get("server_public_key")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| match reply.get("error").and_then(Value::as_str) {
                Some(e) => AgentError::Remote(e.to_string()),
                None => AgentError::InvalidArgument("reply carries no server_public_key".into()),
            })?;
        debug!(entity = %self.store.name(), "Learned server public key");
        Ok(self.server_public_key.insert(key.to_string()).as_str())
    }

    /// Add the requester key and reply preference to plaintext arguments.
    pub fn request_args(&self, args: Value, encrypted: bool) -> AgentResult<Value> {
        let mut obj = into_object(args)?;
        obj.insert(
            "requester_public_key".to_string(),
            Value::String(self.store.public_key_pem().to_string()),
        );
        obj.insert("encrypted".to_string(), Value::Bool(encrypted));
        Ok(Value::Object(obj))
    }

    /// Seal arguments for the server. The reply comes back sealed.
    pub fn seal_request(&self, args: Value) -> AgentResult<Value> {
        let server_key = self
            .server_public_key
            .as_deref()
            .ok_or(AgentError::ServerKeyUnknown)?;
        let inner = self.request_args(args, true)?;
        Ok(envelope::seal(&inner, server_key, &self.store)?.to_value()?)
    }

    /// Read a tool reply, opening it if sealed.
    ///
    /// Error replies become [`AgentError::Remote`].
    pub fn read_response(&self, reply: &Value) -> AgentResult<Value> {
        if reply.get("success").and_then(Value::as_bool) == Some(false) {
            if let Some(e) = reply.get("error").and_then(Value::as_str) {
                return Err(AgentError::Remote(e.to_string()));
            }
        }
        Ok(envelope::unwrap_reply(reply, &self.store)?)
    }
}

fn into_object(args: Value) -> AgentResult<Map<String, Value>> {
    match args {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(AgentError::InvalidArgument(
            "tool arguments must be a JSON object".to_string(),
        )),
    }
}
