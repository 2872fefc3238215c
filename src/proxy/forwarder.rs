//! Message forwarding module
//!
//! One [`Forwarder`] relays a single direction: it reads from one transport's
//! read stream, runs the optional transform, and writes to the other
//! transport's write stream. Failures are isolated per message.

use futures::FutureExt;
use log::{debug, warn};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::common::{Direction, ProxyError};
use crate::transport::{ReadStream, WriteStream};
use super::hooks::{ErrorHandler, MessageTransform};

/// Unidirectional relay task
pub(crate) struct Forwarder<M> {
    direction: Direction,
    read: ReadStream<M>,
    write: WriteStream<M>,
    transform: Option<Arc<dyn MessageTransform<M>>>,
    on_error: Option<Arc<dyn ErrorHandler>>,
}

/// What the loop should do with the current item
enum Step<M> {
    Forward(M),
    Skip,
    Stop,
}

impl<M: Send + 'static> Forwarder<M> {
    pub(crate) fn new(
        direction: Direction,
        read: ReadStream<M>,
        write: WriteStream<M>,
        transform: Option<Arc<dyn MessageTransform<M>>>,
        on_error: Option<Arc<dyn ErrorHandler>>,
    ) -> Self {
        Self {
            direction,
            read,
            write,
            transform,
            on_error,
        }
    }

    /// Forward until the read stream ends or `cancel` fires
    ///
    /// Cancellation is checked first at every suspension point, so nothing
    /// is sent once it has fired. Neither channel is closed here; both are
    /// handed back so the caller decides when they go away.
    ///
    /// # Returns
    ///
    /// Returns the read and write streams this loop was given
    pub(crate) async fn run(mut self, cancel: CancellationToken) -> (ReadStream<M>, WriteStream<M>) {
        debug!("Forwarding {} started", self.direction);

        loop {
            let item = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                item = self.read.recv() => item,
            };

            let message = match item {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    warn!("Received error from {} stream: {}", self.direction, e);
                    self.report(e);
                    continue;
                }
                None => {
                    debug!("{} stream closed", self.direction);
                    break;
                }
            };

            let message = match self.apply_transform(message, &cancel).await {
                Step::Forward(message) => message,
                Step::Skip => continue,
                Step::Stop => break,
            };

            let sent = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                sent = self.write.send(message) => sent,
            };

            if sent.is_err() {
                let e = ProxyError::ChannelClosed(self.direction);
                warn!("Error forwarding message: {}", e);
                self.report(e);
            }
        }

        if cancel.is_cancelled() {
            debug!("Forwarding {} cancelled", self.direction);
        }

        (self.read, self.write)
    }

    async fn apply_transform(&self, message: M, cancel: &CancellationToken) -> Step<M> {
        let transform = match &self.transform {
            Some(transform) => transform,
            None => return Step::Forward(message),
        };

        // A panicking hook is one failed message, not a dead direction
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Step::Stop,
            outcome = AssertUnwindSafe(transform.transform(message)).catch_unwind() => outcome,
        };

        let failure = match outcome {
            Ok(Ok(Some(message))) => return Step::Forward(message),
            Ok(Ok(None)) => {
                debug!("Message dropped by transform function in {}", self.direction);
                return Step::Skip;
            }
            Ok(Err(e)) => e,
            Err(panic) => ProxyError::Other(format!("transform panicked: {}", panic_message(&*panic))),
        };

        let e = ProxyError::Transform {
            direction: self.direction,
            source: Box::new(failure),
        };
        warn!("Error forwarding message: {}", e);
        self.report(e);
        Step::Skip
    }

    fn report(&self, error: ProxyError) {
        if let Some(handler) = &self.on_error {
            handler.handle(error);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
