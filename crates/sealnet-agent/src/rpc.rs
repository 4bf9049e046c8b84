//! Line-delimited JSON request/response framing.
//!
//! Each input line is one [`RpcRequest`]; each answer is one [`RpcResponse`]
//! on its own line. Tool failures are ordinary results carrying
//! `"success": false`; the `error` field is reserved for framing problems
//! such as unparseable lines or unknown methods.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::server::ToolServer;

pub const METHOD_LIST_TOOLS: &str = "list_tools";
pub const METHOD_CALL_TOOL: &str = "call_tool";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RpcResponse {
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Value, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Answer one request line.
pub fn handle_line(server: &ToolServer, line: &str) -> RpcResponse {
    let request: RpcRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "Unparseable request line");
            return RpcResponse::err(Value::Null, format!("Invalid request: {}", e));
        }
    };
    handle_request(server, request)
}

pub fn handle_request(server: &ToolServer, request: RpcRequest) -> RpcResponse {
    debug!(method = %request.method, "Handling request");
    match request.method.as_str() {
        METHOD_LIST_TOOLS => RpcResponse::ok(request.id, json!({ "tools": server.list_tools() })),
        METHOD_CALL_TOOL => match serde_json::from_value::<CallToolParams>(request.params) {
            Ok(params) => {
                let arguments = if params.arguments.is_null() {
                    json!({})
                } else {
                    params.arguments
                };
                RpcResponse::ok(request.id, server.call_tool(&params.name, &arguments))
            }
            Err(e) => RpcResponse::err(request.id, format!("Invalid params: {}", e)),
        },
        other => RpcResponse::err(request.id, format!("Unknown method: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_omits_empty_fields() {
        let ok = serde_json::to_value(RpcResponse::ok(json!(1), json!({"a": 1}))).unwrap();
        assert_eq!(ok, json!({"id": 1, "result": {"a": 1}}));

        let err = serde_json::to_value(RpcResponse::err(json!("x"), "bad")).unwrap();
        assert_eq!(err, json!({"id": "x", "error": "bad"}));
    }

    #[test]
    fn test_request_defaults() {
        let req: RpcRequest = serde_json::from_str(r#"{"method": "list_tools"}"#).unwrap();
        assert_eq!(req.id, Value::Null);
        assert_eq!(req.params, Value::Null);
    }
}
