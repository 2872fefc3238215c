//! JSON-RPC message types
//!
//! The proxy core treats messages as opaque values. These types exist so the
//! transports can frame them and the inspection hooks can describe them.
//!
//! Members the types do not name (for example `_meta` extensions) are kept in
//! each message's `extra` map and written back out, so relaying a message
//! never strips them. Member order on the wire is not preserved.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// JSON-RPC protocol version carried by every message
pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric identifier, integer or not
    Number(Number),
    /// String identifier
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::String(id.to_string())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self::String(id)
    }
}

/// A request that expects a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A one-way notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A successful response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Error payload of an error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// An error response
///
/// `id` is absent when the peer could not determine the request id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<RequestId>,
    pub error: ErrorObject,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Any JSON-RPC message
///
/// Variant order matters for untagged deserialization: a request is tried
/// before a notification so that an `id` is never silently discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
    Response(JsonRpcResponse),
    Error(JsonRpcError),
}

impl JsonRpcMessage {
    /// Protocol version string the message was sent with
    pub fn jsonrpc(&self) -> &str {
        match self {
            Self::Request(m) => &m.jsonrpc,
            Self::Notification(m) => &m.jsonrpc,
            Self::Response(m) => &m.jsonrpc,
            Self::Error(m) => &m.jsonrpc,
        }
    }
}

/// Kind of a message, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Notification,
    Response,
    Error,
}

/// Envelope exchanged between the transports and the proxy
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMessage {
    /// The JSON-RPC message itself
    pub message: JsonRpcMessage,
}

impl SessionMessage {
    /// Wrap a JSON-RPC message
    pub fn new(message: JsonRpcMessage) -> Self {
        Self { message }
    }

    /// Build a request
    pub fn request(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self::new(JsonRpcMessage::Request(JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
            extra: Map::new(),
        }))
    }

    /// Build a notification
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::new(JsonRpcMessage::Notification(JsonRpcNotification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            extra: Map::new(),
        }))
    }

    /// Build a successful response
    pub fn response(id: RequestId, result: Value) -> Self {
        Self::new(JsonRpcMessage::Response(JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
            extra: Map::new(),
        }))
    }

    /// Build an error response
    pub fn error(id: Option<RequestId>, code: i64, message: impl Into<String>) -> Self {
        Self::new(JsonRpcMessage::Error(JsonRpcError {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: ErrorObject {
                code,
                message: message.into(),
                data: None,
            },
            extra: Map::new(),
        }))
    }

    /// Which of the four message shapes this is
    pub fn kind(&self) -> MessageKind {
        match &self.message {
            JsonRpcMessage::Request(_) => MessageKind::Request,
            JsonRpcMessage::Notification(_) => MessageKind::Notification,
            JsonRpcMessage::Response(_) => MessageKind::Response,
            JsonRpcMessage::Error(_) => MessageKind::Error,
        }
    }

    /// Method name for requests and notifications
    pub fn method(&self) -> Option<&str> {
        match &self.message {
            JsonRpcMessage::Request(m) => Some(&m.method),
            JsonRpcMessage::Notification(m) => Some(&m.method),
            _ => None,
        }
    }

    /// Request id, if the message carries one
    pub fn id(&self) -> Option<&RequestId> {
        match &self.message {
            JsonRpcMessage::Request(m) => Some(&m.id),
            JsonRpcMessage::Notification(_) => None,
            JsonRpcMessage::Response(m) => Some(&m.id),
            JsonRpcMessage::Error(m) => m.id.as_ref(),
        }
    }
}

impl From<JsonRpcMessage> for SessionMessage {
    fn from(message: JsonRpcMessage) -> Self {
        Self::new(message)
    }
}
