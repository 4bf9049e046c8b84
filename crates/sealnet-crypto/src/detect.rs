//! Envelope detection for incoming JSON messages.
//!
//! Lets a receiver decide how to treat a message before touching any key.

use serde_json::Value;

use crate::envelope::ENCRYPTED_FIELD;

/// How a JSON message presents itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// `"encrypted": true` with a string `payload`.
    Sealed,
    /// `"encrypted": false`.
    Plain,
    /// No usable marker (absent, not a boolean, or not an object), or a
    /// sealed marker without a payload.
    Unmarked,
}

/// Classify a JSON message.
pub fn detect_envelope(value: &Value) -> EnvelopeKind {
    let Some(obj) = value.as_object() else {
        return EnvelopeKind::Unmarked;
    };

    match obj.get(ENCRYPTED_FIELD).and_then(Value::as_bool) {
        Some(true) if obj.get("payload").is_some_and(Value::is_string) => EnvelopeKind::Sealed,
        Some(false) => EnvelopeKind::Plain,
        _ => EnvelopeKind::Unmarked,
    }
}

/// Check if a message is a sealed envelope.
pub fn is_sealed(value: &Value) -> bool {
    matches!(detect_envelope(value), EnvelopeKind::Sealed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_sealed() {
        let value = json!({"encrypted": true, "payload": "{}", "sender_public_key": "PEM"});
        assert_eq!(detect_envelope(&value), EnvelopeKind::Sealed);
        assert!(is_sealed(&value));
    }

    #[test]
    fn test_detect_plain() {
        let value = json!({"encrypted": false, "documents": []});
        assert_eq!(detect_envelope(&value), EnvelopeKind::Plain);
        assert!(!is_sealed(&value));
    }

    #[test]
    fn test_detect_sealed_without_payload() {
        let value = json!({"encrypted": true});
        assert_eq!(detect_envelope(&value), EnvelopeKind::Unmarked);
    }

    #[test]
    fn test_detect_unmarked() {
        assert_eq!(detect_envelope(&json!({"status": "ok"})), EnvelopeKind::Unmarked);
        assert_eq!(detect_envelope(&json!({"encrypted": 1})), EnvelopeKind::Unmarked);
        assert_eq!(detect_envelope(&json!("text")), EnvelopeKind::Unmarked);
        assert_eq!(detect_envelope(&Value::Null), EnvelopeKind::Unmarked);
    }
}
