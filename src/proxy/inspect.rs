//! Message inspection hooks
//!
//! Transforms that log a one-line description of every message and forward
//! it unchanged.

use futures::future::BoxFuture;
use log::info;

use crate::common::{Direction, Result};
use crate::protocol::{MessageKind, SessionMessage};
use super::hooks::MessageTransform;

/// One-line description of a message, e.g. `tools/list (id: 1)`
pub fn describe(message: &SessionMessage) -> String {
    let id = message
        .id()
        .map(ToString::to_string)
        .unwrap_or_else(|| "N/A".to_string());

    match message.kind() {
        MessageKind::Request | MessageKind::Notification => {
            format!("{} (id: {})", message.method().unwrap_or_default(), id)
        }
        MessageKind::Response => format!("Response (id: {})", id),
        MessageKind::Error => format!("Error (id: {})", id),
    }
}

/// Logging transform for one direction
#[derive(Debug, Clone, Copy)]
pub struct Inspector {
    direction: Direction,
}

impl MessageTransform<SessionMessage> for Inspector {
    fn transform(&self, message: SessionMessage) -> BoxFuture<'static, Result<Option<SessionMessage>>> {
        info!("{}: {}", self.direction.label(), describe(&message));
        Box::pin(futures::future::ready(Ok(Some(message))))
    }
}

/// Create an inspection hook for `direction`
pub fn inspector(direction: Direction) -> Inspector {
    Inspector { direction }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestId;
    use serde_json::json;

    #[test]
    fn test_describe() {
        let request = SessionMessage::request(RequestId::from(1), "tools/list", None);
        assert_eq!(describe(&request), "tools/list (id: 1)");

        let notification = SessionMessage::notification("notifications/initialized", None);
        assert_eq!(describe(&notification), "notifications/initialized (id: N/A)");

        let response = SessionMessage::response(RequestId::String("abc".to_string()), json!({}));
        assert_eq!(describe(&response), "Response (id: abc)");

        let error = SessionMessage::error(None, -32700, "Parse error");
        assert_eq!(describe(&error), "Error (id: N/A)");
    }

    #[tokio::test]
    async fn test_inspector_forwards_unchanged() {
        let message = SessionMessage::request(RequestId::from(7), "ping", None);
        let hook = inspector(Direction::ClientToServer);

        let out = hook.transform(message.clone()).await.unwrap();
        assert_eq!(out, Some(message));
    }
}
