//! Proxy session supervisor
//!
//! A [`ProxySession`] runs the two forwarding directions as separate Tokio
//! tasks under one cancellation token. Both start together in
//! [`ProxySession::start`] and both stop together when the session is shut
//! down or dropped.

use log::{debug, info};
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use crate::common::{Direction, ProxyError, Result};
use crate::transport::{ReadStream, TransportStreams, WriteStream};
use super::forwarder::Forwarder;
use super::hooks::ProxyOptions;

/// Lifecycle of a session as seen by its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Both directions are live, or ended on their own end-of-stream
    Running,
    /// Cancellation requested, at least one direction has not stopped yet
    Stopping,
    /// Cancellation requested and both directions have stopped
    Stopped,
}

/// Channels handed back when a session shuts down
#[derive(Debug)]
pub struct SessionStreams<M> {
    /// The client-facing transport's streams
    pub client: TransportStreams<M>,
    /// The server-facing transport's streams
    pub server: TransportStreams<M>,
}

type DirectionTask<M> = JoinHandle<(ReadStream<M>, WriteStream<M>)>;

/// One direction's task plus the token it fires when it ends
struct Worker<M> {
    task: Option<DirectionTask<M>>,
    finished: CancellationToken,
}

impl<M: Send + 'static> Worker<M> {
    fn spawn(forwarder: Forwarder<M>, cancel: CancellationToken) -> Self {
        let finished = CancellationToken::new();
        let done = finished.clone();
        let task = tokio::spawn(async move {
            // Fires on every exit path, including abort
            let _guard = done.drop_guard();
            forwarder.run(cancel).await
        });

        Self {
            task: Some(task),
            finished,
        }
    }

    async fn join(&mut self, direction: Direction) -> Result<(ReadStream<M>, WriteStream<M>)> {
        let task = self.task.take().ok_or_else(|| {
            ProxyError::Task(format!("{} forwarding task already joined", direction))
        })?;

        task.await
            .map_err(|e| ProxyError::Task(format!("{} forwarding task failed: {}", direction, e)))
    }
}

/// A running proxy session
///
/// Created by [`ProxySession::start`]. The session reads from and writes to
/// the channels it was given but never closes them: [`shutdown`] returns
/// them intact. Dropping the session without calling `shutdown` cancels and
/// aborts both directions, and the channels go away with the tasks.
///
/// [`shutdown`]: ProxySession::shutdown
pub struct ProxySession<M> {
    cancel: CancellationToken,
    client_to_server: Worker<M>,
    server_to_client: Worker<M>,
}

impl<M: Send + 'static> ProxySession<M> {
    /// Start forwarding between two transports
    ///
    /// Spawns the client → server and server → client directions on the
    /// current Tokio runtime and returns as soon as both are launched.
    ///
    /// # Parameters
    ///
    /// * `client` - Streams of the client-facing transport
    /// * `server` - Streams of the server-facing transport
    /// * `options` - Optional error handler and per-direction transforms
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mcp_proxy::proxy::{ProxyOptions, ProxySession};
    /// use mcp_proxy::transport::memory;
    ///
    /// # async fn example() -> mcp_proxy::Result<()> {
    /// let (client, _client_peer) = memory::pair::<String>(16);
    /// let (server, _server_peer) = memory::pair::<String>(16);
    ///
    /// let options = ProxyOptions::new()
    ///     .on_error(|e: mcp_proxy::ProxyError| eprintln!("Proxy error: {}", e));
    /// let session = ProxySession::start(client, server, options);
    ///
    /// let streams = session.run_until(tokio::time::sleep(std::time::Duration::from_secs(1))).await?;
    /// # drop(streams);
    /// # Ok(())
    /// # }
    /// ```
    pub fn start(
        client: TransportStreams<M>,
        server: TransportStreams<M>,
        options: ProxyOptions<M>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let ProxyOptions {
            on_error,
            on_client_message,
            on_server_message,
        } = options;

        let client_to_server = Forwarder::new(
            Direction::ClientToServer,
            client.read,
            server.write,
            on_client_message,
            on_error.clone(),
        );
        let server_to_client = Forwarder::new(
            Direction::ServerToClient,
            server.read,
            client.write,
            on_server_message,
            on_error,
        );

        let session = Self {
            client_to_server: Worker::spawn(client_to_server, cancel.child_token()),
            server_to_client: Worker::spawn(server_to_client, cancel.child_token()),
            cancel,
        };

        info!("Proxy session started");
        session
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        if !self.cancel.is_cancelled() {
            SessionState::Running
        } else if self.is_finished(Direction::ClientToServer)
            && self.is_finished(Direction::ServerToClient)
        {
            SessionState::Stopped
        } else {
            SessionState::Stopping
        }
    }

    /// Whether forwarding in `direction` has stopped
    ///
    /// A direction stops on its own when its read stream ends.
    pub fn is_finished(&self, direction: Direction) -> bool {
        self.worker(direction).finished.is_cancelled()
    }

    /// Future that completes once forwarding in `direction` has stopped
    ///
    /// The future does not borrow the session, so it can be awaited
    /// alongside [`run_until`](Self::run_until).
    pub fn finished(&self, direction: Direction) -> WaitForCancellationFutureOwned {
        self.worker(direction).finished.clone().cancelled_owned()
    }

    /// Keep the session running until `stop` completes, then shut down
    pub async fn run_until<F>(self, stop: F) -> Result<SessionStreams<M>>
    where
        F: Future,
    {
        stop.await;
        self.shutdown().await
    }

    /// Cancel both directions and wait for them to stop
    ///
    /// Messages still queued in the read streams stay there; nothing in
    /// flight is drained.
    ///
    /// # Returns
    ///
    /// Returns the channels the session was started with
    ///
    /// # Errors
    ///
    /// Returns `ProxyError::Task` if a forwarding task panicked, in which
    /// case its channels are lost.
    pub async fn shutdown(mut self) -> Result<SessionStreams<M>> {
        debug!("Stopping proxy session");
        self.cancel.cancel();

        let c2s = self.client_to_server.join(Direction::ClientToServer).await;
        let s2c = self.server_to_client.join(Direction::ServerToClient).await;
        let (client_read, server_write) = c2s?;
        let (server_read, client_write) = s2c?;

        info!("Proxy session stopped");
        Ok(SessionStreams {
            client: TransportStreams::new(client_read, client_write),
            server: TransportStreams::new(server_read, server_write),
        })
    }

    fn worker(&self, direction: Direction) -> &Worker<M> {
        match direction {
            Direction::ClientToServer => &self.client_to_server,
            Direction::ServerToClient => &self.server_to_client,
        }
    }
}

impl<M> Drop for ProxySession<M> {
    fn drop(&mut self) {
        self.cancel.cancel();
        for task in [&self.client_to_server.task, &self.server_to_client.task]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }
}

impl<M> std::fmt::Debug for ProxySession<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxySession")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("client_to_server_finished", &self.client_to_server.finished.is_cancelled())
            .field("server_to_client_finished", &self.server_to_client.finished.is_cancelled())
            .finish()
    }
}
