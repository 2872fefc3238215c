//! Transport module
//!
//! A transport turns a duplex byte channel (this process's stdio, a child
//! process, an in-memory pipe) into a pair of message channels the proxy can
//! forward between:
//!
//! - a [`ReadStream`] yielding, in order, either a message or the
//!   transport-level error that replaced it, and ending when the peer closes;
//! - a [`WriteStream`] accepting messages in order.
//!
//! The value returned alongside the streams owns the background I/O tasks.
//! Dropping it tears the transport down, which is why the proxy session never
//! owns transports itself.

pub mod memory;
mod io;
mod process;
mod stdio;

pub use io::IoTransport;
pub use process::{ProcessTransport, ServerParameters};
pub use stdio::StdioTransport;

use tokio::sync::mpsc;

use crate::common::Result;
use crate::config::{defaults, ProxyConfig};
use crate::protocol::SessionMessage;

/// Inbound side of a transport
pub type ReadStream<M = SessionMessage> = mpsc::Receiver<Result<M>>;

/// Outbound side of a transport
pub type WriteStream<M = SessionMessage> = mpsc::Sender<M>;

/// The pair of channels a transport exposes to the proxy
#[derive(Debug)]
pub struct TransportStreams<M = SessionMessage> {
    /// Messages (or transport errors) arriving from the peer
    pub read: ReadStream<M>,
    /// Messages to deliver to the peer
    pub write: WriteStream<M>,
}

impl<M> TransportStreams<M> {
    /// Bundle a read and a write stream
    pub fn new(read: ReadStream<M>, write: WriteStream<M>) -> Self {
        Self { read, write }
    }

    /// Split back into the read and write streams
    pub fn into_parts(self) -> (ReadStream<M>, WriteStream<M>) {
        (self.read, self.write)
    }
}

impl<M> From<(ReadStream<M>, WriteStream<M>)> for TransportStreams<M> {
    fn from((read, write): (ReadStream<M>, WriteStream<M>)) -> Self {
        Self::new(read, write)
    }
}

/// Sizing shared by all byte-stream transports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    /// Bound of the read and write channels
    pub channel_capacity: usize,
    /// Longest accepted line, in bytes
    pub max_message_size: usize,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            channel_capacity: defaults::channel_capacity(),
            max_message_size: defaults::max_message_size(),
        }
    }
}

impl From<&ProxyConfig> for TransportSettings {
    fn from(config: &ProxyConfig) -> Self {
        Self {
            channel_capacity: config.channel_capacity,
            max_message_size: config.max_message_size,
        }
    }
}
