//! Proxy core
//!
//! This module implements bidirectional message forwarding between a
//! client-facing and a server-facing transport.
//!
//! Each direction runs as its own task: it reads from one transport, applies
//! the optional transform hook and writes to the other. A failure while
//! handling one message (transport error, failing transform, closed
//! outbound channel) is reported to the error handler and never stops the
//! direction. Directions stop when their read stream ends or when the
//! session is cancelled.

mod forwarder;
pub mod hooks;
pub mod inspect;
pub mod session;

pub use hooks::{ErrorHandler, MessageTransform, ProxyOptions};
pub use inspect::{describe, inspector, Inspector};
pub use session::{ProxySession, SessionState, SessionStreams};
