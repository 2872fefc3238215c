//! Error handling module
//!
//! This module defines the error types and result type aliases used in the application.

use thiserror::Error;
use std::io;

use super::types::Direction;

/// MCP proxy error type
#[derive(Error, Debug)]
pub enum ProxyError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level failure delivered in place of a message
    #[error("Transport error: {0}")]
    Transport(String),

    /// A framed message exceeded the configured size limit
    #[error("Message exceeds maximum size of {0} bytes")]
    MessageTooLarge(usize),

    /// A transform hook failed while processing one message
    #[error("Transform failed in {direction}: {source}")]
    Transform {
        /// Direction the message was travelling
        direction: Direction,
        /// The hook's own failure
        source: Box<ProxyError>,
    },

    /// The outbound channel rejected a message
    #[error("Outbound channel closed while forwarding {0}")]
    ChannelClosed(Direction),

    /// Backend process error
    #[error("Process error: {0}")]
    Process(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A background task failed to complete
    #[error("Task error: {0}")]
    Task(String),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `ProxyError`.
pub type Result<T> = std::result::Result<T, ProxyError>;
