//! Caller-supplied hooks
//!
//! Both hooks are single-operation traits with blanket implementations for
//! closures, so callers can pass either a plain closure or their own type.

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

use crate::common::{ProxyError, Result};

/// Inspects, rewrites, or drops a message before it is forwarded
///
/// Returning `Ok(None)` drops the message; that is filtering, not failure.
/// Returning `Err` also drops the message, and the error is reported to the
/// session's [`ErrorHandler`].
pub trait MessageTransform<M>: Send + Sync + 'static {
    fn transform(&self, message: M) -> BoxFuture<'static, Result<Option<M>>>;
}

impl<M, F, Fut> MessageTransform<M> for F
where
    F: Fn(M) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<M>>> + Send + 'static,
{
    fn transform(&self, message: M) -> BoxFuture<'static, Result<Option<M>>> {
        Box::pin(self(message))
    }
}

/// Receives every non-fatal failure seen while forwarding
///
/// Called from whichever direction hit the failure, so both directions may
/// call it concurrently.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle(&self, error: ProxyError);
}

impl<F> ErrorHandler for F
where
    F: Fn(ProxyError) + Send + Sync + 'static,
{
    fn handle(&self, error: ProxyError) {
        self(error)
    }
}

/// Hooks for one proxy session
///
/// Everything is optional. Without hooks, messages are forwarded unchanged
/// and failures are only logged.
pub struct ProxyOptions<M> {
    pub(crate) on_error: Option<Arc<dyn ErrorHandler>>,
    pub(crate) on_client_message: Option<Arc<dyn MessageTransform<M>>>,
    pub(crate) on_server_message: Option<Arc<dyn MessageTransform<M>>>,
}

impl<M> ProxyOptions<M> {
    /// Options with no hooks installed
    pub fn new() -> Self {
        Self {
            on_error: None,
            on_client_message: None,
            on_server_message: None,
        }
    }

    /// Handler for transport errors and forwarding failures in either direction
    pub fn on_error(mut self, handler: impl ErrorHandler) -> Self {
        self.on_error = Some(Arc::new(handler));
        self
    }

    /// Transform applied to messages travelling client → server
    pub fn on_client_message(mut self, transform: impl MessageTransform<M>) -> Self {
        self.on_client_message = Some(Arc::new(transform));
        self
    }

    /// Transform applied to messages travelling server → client
    pub fn on_server_message(mut self, transform: impl MessageTransform<M>) -> Self {
        self.on_server_message = Some(Arc::new(transform));
        self
    }
}

impl<M> Default for ProxyOptions<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> std::fmt::Debug for ProxyOptions<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyOptions")
            .field("on_error", &self.on_error.is_some())
            .field("on_client_message", &self.on_client_message.is_some())
            .field("on_server_message", &self.on_server_message.is_some())
            .finish()
    }
}
