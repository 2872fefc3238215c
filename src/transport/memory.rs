//! In-memory transport
//!
//! Useful for embedding the proxy in-process and for tests: one end is handed
//! to the proxy, the other is driven directly by the caller.

use tokio::sync::mpsc;

use crate::common::Result;
use super::TransportStreams;

/// The caller's end of an in-memory transport
#[derive(Debug)]
pub struct MemoryPeer<M> {
    /// Feeds the proxy's read stream; drop it to signal end-of-stream
    pub inbound: mpsc::Sender<Result<M>>,
    /// Receives whatever the proxy writes
    pub outbound: mpsc::Receiver<M>,
}

/// Create an in-memory transport with channels bounded at `capacity`
///
/// # Panics
///
/// Panics if `capacity` is zero, like [`tokio::sync::mpsc::channel`].
pub fn pair<M>(capacity: usize) -> (TransportStreams<M>, MemoryPeer<M>) {
    let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
    let (outbound_tx, outbound_rx) = mpsc::channel(capacity);

    (
        TransportStreams::new(inbound_rx, outbound_tx),
        MemoryPeer {
            inbound: inbound_tx,
            outbound: outbound_rx,
        },
    )
}
