//! Byte-stream transport
//!
//! Frames any `AsyncRead`/`AsyncWrite` pair with [`JsonRpcCodec`] and pumps
//! it through two background tasks.

use futures::{SinkExt, StreamExt};
use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;

use crate::protocol::{JsonRpcCodec, SessionMessage};
use super::{TransportSettings, TransportStreams};

/// Transport over an arbitrary reader/writer pair
///
/// Owns the reader and writer tasks; both are aborted on drop.
#[derive(Debug)]
pub struct IoTransport {
    label: &'static str,
    reader: JoinHandle<()>,
    writer: Option<JoinHandle<()>>,
    closing: CancellationToken,
}

impl IoTransport {
    /// Start pumping `reader` and `writer`
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Parameters
    ///
    /// * `reader` - Byte source the peer writes into
    /// * `writer` - Byte sink the peer reads from
    /// * `settings` - Channel capacity and frame size limit
    /// * `label` - Name used in log messages
    ///
    /// # Returns
    ///
    /// Returns the transport handle and the streams to hand to the proxy
    pub fn new<R, W>(
        reader: R,
        writer: W,
        settings: &TransportSettings,
        label: &'static str,
    ) -> (Self, TransportStreams)
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (read_tx, read_rx) = mpsc::channel(settings.channel_capacity);
        let (write_tx, mut write_rx) = mpsc::channel::<SessionMessage>(settings.channel_capacity);

        let mut frames = FramedRead::new(reader, JsonRpcCodec::new(settings.max_message_size));
        let reader = tokio::spawn(async move {
            while let Some(frame) = frames.next().await {
                // An outer error is an I/O failure; FramedRead ends after it
                let item = frame.and_then(|parsed| parsed);
                if read_tx.send(item).await.is_err() {
                    debug!("{} read stream dropped by consumer", label);
                    return;
                }
            }
            debug!("{} reached end of input", label);
        });

        let closing = CancellationToken::new();
        let close_requested = closing.clone();
        let mut sink = FramedWrite::new(writer, JsonRpcCodec::new(settings.max_message_size));
        let writer = tokio::spawn(async move {
            loop {
                // Queued messages win over a close request
                let message = tokio::select! {
                    biased;
                    message = write_rx.recv() => message,
                    _ = close_requested.cancelled() => None,
                };
                let Some(message) = message else { break };

                if let Err(e) = sink.send(message).await {
                    warn!("{} failed to write message: {}", label, e);
                    return;
                }
            }
            if let Err(e) = sink.close().await {
                debug!("{} failed to close writer: {}", label, e);
            }
            debug!("{} write stream closed", label);
        });

        let transport = Self {
            label,
            reader,
            writer: Some(writer),
            closing,
        };
        (transport, TransportStreams::new(read_rx, write_tx))
    }

    /// Name used in log messages
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Whether both background tasks have stopped
    pub fn is_finished(&self) -> bool {
        self.reader.is_finished() && self.writer.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Write out every queued message, then close the underlying writer
    ///
    /// Messages sent after the queue has drained are dropped. Waits for the
    /// writer task to end, so callers that cannot block on a stuck peer
    /// should wrap this in a timeout. Calling it again is a no-op.
    pub async fn close_writer(&mut self) {
        self.closing.cancel();
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.await {
                debug!("{} writer task ended abnormally: {}", self.label, e);
            }
        }
    }
}

impl Drop for IoTransport {
    fn drop(&mut self) {
        self.reader.abort();
        if let Some(writer) = &self.writer {
            writer.abort();
        }
    }
}
