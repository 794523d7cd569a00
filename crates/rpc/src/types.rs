//! JSON-RPC 2.0 wire types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// A single JSON-RPC call.
///
/// `id` is `None` when the field is absent (a notification) and
/// `Some(Value::Null)` when the caller sent an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RpcRequest {
    /// Read one batch element or a bare request body.
    ///
    /// On failure returns the id to answer with: the element's `id` when it
    /// is a legal id, else `null`.
    pub fn from_value(item: Value) -> Result<Self, Value> {
        let fallback_id = item
            .get("id")
            .filter(|id| is_valid_id(id))
            .cloned()
            .unwrap_or(Value::Null);

        let request: RpcRequest = serde_json::from_value(item).map_err(|_| fallback_id.clone())?;

        if let Some(version) = &request.jsonrpc {
            if version != JSONRPC_VERSION {
                return Err(fallback_id);
            }
        }
        if let Some(id) = &request.id {
            if !is_valid_id(id) {
                return Err(Value::Null);
            }
        }
        Ok(request)
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

fn is_valid_id(id: &Value) -> bool {
    matches!(id, Value::Null | Value::Number(_) | Value::String(_))
}

/// Error member of a failed response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: RpcErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Response body; its shape mirrors the request body (object vs. array)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcReply {
    Single(RpcResponse),
    Batch(Vec<RpcResponse>),
}

impl RpcReply {
    pub fn has_error(&self) -> bool {
        match self {
            RpcReply::Single(response) => response.is_error(),
            RpcReply::Batch(responses) => responses.iter().any(RpcResponse::is_error),
        }
    }
}
