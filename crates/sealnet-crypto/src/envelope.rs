//! Outer JSON shape for requests and replies between entities.
//!
//! A sealed message travels as
//!
//! ```json
//! {"encrypted": true, "payload": "<SealedPayload JSON>", "sender_public_key": "<PEM>"}
//! ```
//!
//! and a plaintext one as the caller's own object with `"encrypted": false`
//! alongside its fields. Whether to seal is the caller's choice per message;
//! nothing is negotiated. [`open`] refuses plaintext messages, so receivers
//! branch on the flag first (or use [`unwrap_reply`], which does).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CryptoError, CryptoResult};
use crate::hybrid::KeyStore;

/// Field carrying the sealed/plaintext marker.
pub const ENCRYPTED_FIELD: &str = "encrypted";

/// Envelope around a possibly sealed JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub encrypted: bool,
    /// JSON-serialized `SealedPayload`; present iff `encrypted`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Sender's public key PEM for the reply path; present iff `encrypted`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
}

impl Envelope {
    /// Read the envelope fields out of an arbitrary JSON message.
    ///
    /// Unrelated fields of a plaintext message are ignored.
    pub fn from_value(value: &Value) -> CryptoResult<Self> {
        if !value.is_object() {
            return Err(CryptoError::Protocol(
                "Envelope must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| CryptoError::Protocol(format!("Malformed envelope: {}", e)))
    }

    pub fn to_value(&self) -> CryptoResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Seal `data` for `recipient_public_key_pem`, signed off with the sender's
/// public key.
pub fn seal(
    data: &Value,
    recipient_public_key_pem: &str,
    sender: &KeyStore,
) -> CryptoResult<Envelope> {
    let json = serde_json::to_string(data)?;
    let payload = sender.encrypt_for(&json, recipient_public_key_pem)?;

    Ok(Envelope {
        encrypted: true,
        payload: Some(payload),
        sender_public_key: Some(sender.public_key_pem().to_string()),
    })
}

/// Open a sealed envelope addressed to `receiver`.
///
/// Plaintext envelopes and envelopes without a payload are rejected with
/// [`CryptoError::Protocol`].
pub fn open(envelope: &Envelope, receiver: &KeyStore) -> CryptoResult<Value> {
    if !envelope.encrypted {
        return Err(CryptoError::Protocol("Message is not encrypted".to_string()));
    }
    let payload = envelope
        .payload
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| CryptoError::Protocol("No encrypted payload found".to_string()))?;

    let json = receiver.decrypt(payload)?;
    serde_json::from_str(&json)
        .map_err(|e| CryptoError::Format(format!("Decrypted payload is not JSON: {}", e)))
}

/// Mark `data` as travelling in the clear.
///
/// Objects gain `"encrypted": false`; any other value is wrapped as
/// `{"encrypted": false, "data": <value>}`.
pub fn plain(data: Value) -> Value {
    let mut obj = match data {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    obj.insert(ENCRYPTED_FIELD.to_string(), Value::Bool(false));
    Value::Object(obj)
}

/// Build a reply in the form the requester asked for.
///
/// With `encrypt` set the reply is sealed for `recipient_public_key_pem`;
/// otherwise it is passed through [`plain`].
pub fn respond(
    data: Value,
    encrypt: bool,
    recipient_public_key_pem: &str,
    sender: &KeyStore,
) -> CryptoResult<Value> {
    debug!(
        entity = %sender.name(),
        encrypted = encrypt,
        "Building reply"
    );
    if encrypt {
        seal(&data, recipient_public_key_pem, sender)?.to_value()
    } else {
        Ok(plain(data))
    }
}

/// Recover the data of a reply, opening it if sealed.
///
/// Plaintext replies come back with the `encrypted` marker removed.
pub fn unwrap_reply(reply: &Value, receiver: &KeyStore) -> CryptoResult<Value> {
    let encrypted = reply
        .get(ENCRYPTED_FIELD)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if encrypted {
        return open(&Envelope::from_value(reply)?, receiver);
    }

    let mut data = reply.clone();
    if let Some(obj) = data.as_object_mut() {
        obj.remove(ENCRYPTED_FIELD);
    }
    Ok(data)
}
