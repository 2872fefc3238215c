//! Process stdio transport
//!
//! The client-facing side of the proxy binary: the MCP client launched this
//! process and talks to it over stdin/stdout.

use log::debug;

use super::{IoTransport, TransportSettings, TransportStreams};

/// Transport over this process's stdin and stdout
#[derive(Debug)]
pub struct StdioTransport {
    io: IoTransport,
}

impl StdioTransport {
    /// Attach to stdin/stdout
    ///
    /// Must be called from within a Tokio runtime. Only one instance should
    /// exist at a time, since both would compete for the same handles.
    pub fn start(settings: &TransportSettings) -> (Self, TransportStreams) {
        debug!("Attaching to process stdio");
        let (io, streams) = IoTransport::new(
            tokio::io::stdin(),
            tokio::io::stdout(),
            settings,
            "stdio",
        );
        (Self { io }, streams)
    }

    /// Whether stdin has been exhausted and stdout closed
    pub fn is_finished(&self) -> bool {
        self.io.is_finished()
    }

    /// Write out everything queued for stdout, then stop writing
    pub async fn close(&mut self) {
        self.io.close_writer().await;
    }
}
