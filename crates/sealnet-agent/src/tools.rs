//! Tool names and their input schemas.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const GET_SERVER_PUBLIC_KEY: &str = "get_server_public_key";
pub const VERIFY_DOCUMENT: &str = "verify_document";
pub const LIST_DOCUMENTS: &str = "list_documents";
pub const SUMMARIZE_TEXT: &str = "summarize_text";

/// A tool advertised by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn requester_key_property() -> Value {
    json!({
        "type": "string",
        "description": "PEM-encoded public key of the requesting entity"
    })
}

fn encrypted_property() -> Value {
    json!({
        "type": "boolean",
        "description": "Whether to return encrypted response",
        "default": false
    })
}

/// Every tool the server exposes, in a stable order.
pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: VERIFY_DOCUMENT.to_string(),
            description: "Verify the status and authenticity of a document by ID".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "document_id": {
                        "type": "string",
                        "description": "The unique identifier of the document to verify"
                    },
                    "requester_public_key": requester_key_property(),
                    "encrypted": encrypted_property()
                },
                "required": ["document_id", "requester_public_key"]
            }),
        },
        ToolDescriptor {
            name: LIST_DOCUMENTS.to_string(),
            description: "List all available documents and their verification status"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "requester_public_key": requester_key_property(),
                    "encrypted": encrypted_property()
                },
                "required": ["requester_public_key"]
            }),
        },
        ToolDescriptor {
            name: SUMMARIZE_TEXT.to_string(),
            description: "Summarize text; requires a valid access key".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {"type": "string", "description": "Text to summarize"},
                    "access_key": {"type": "string", "description": "Access key authorizing the request"},
                    "max_sentences": {"type": "integer", "minimum": 1},
                    "requester_public_key": requester_key_property(),
                    "encrypted": encrypted_property()
                },
                "required": ["text", "access_key", "requester_public_key"]
            }),
        },
        ToolDescriptor {
            name: GET_SERVER_PUBLIC_KEY.to_string(),
            description: "Get the server's public key for establishing secure communication"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
    ]
}
