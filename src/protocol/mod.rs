//! Protocol module
//!
//! This module defines the JSON-RPC message model carried by the transports
//! and the newline-delimited codec used to frame it on byte streams.

mod codec;
mod message;

pub use codec::{decode_line, JsonRpcCodec};
pub use message::{
    ErrorObject, JsonRpcError, JsonRpcMessage, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, MessageKind, RequestId, SessionMessage, JSONRPC_VERSION,
};
