//! Newline-delimited JSON codec
//!
//! Each frame is one JSON-RPC message on its own line. A malformed line is a
//! per-message failure, not a stream failure: the decoder yields it as an
//! `Err` item and carries on with the next line.

use bytes::{BufMut, BytesMut};
use log::trace;
use std::io;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

use crate::common::{ProxyError, Result};
use super::message::{JsonRpcMessage, SessionMessage, JSONRPC_VERSION};

/// Parse one line into a message
pub fn decode_line(line: &str) -> Result<SessionMessage> {
    let message: JsonRpcMessage = serde_json::from_str(line)?;

    if message.jsonrpc() != JSONRPC_VERSION {
        return Err(ProxyError::Transport(format!(
            "Unsupported JSON-RPC version: {}",
            message.jsonrpc()
        )));
    }

    Ok(SessionMessage::new(message))
}

/// Codec for JSON-RPC messages framed one per line
///
/// The decoder's item is itself a `Result` so that a bad line can be
/// reported without ending the stream. The outer error is reserved for I/O.
#[derive(Debug)]
pub struct JsonRpcCodec {
    lines: LinesCodec,
    max_length: usize,
}

impl JsonRpcCodec {
    /// Create a codec that rejects lines longer than `max_length` bytes
    pub fn new(max_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_length),
            max_length,
        }
    }

    fn next_frame(
        &mut self,
        src: &mut BytesMut,
        eof: bool,
    ) -> std::result::Result<Option<Result<SessionMessage>>, ProxyError> {
        loop {
            let decoded = if eof {
                self.lines.decode_eof(src)
            } else {
                self.lines.decode(src)
            };

            match decoded {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    trace!("Decoded line of {} bytes", line.len());
                    return Ok(Some(decode_line(&line)));
                }
                Ok(None) => return Ok(None),
                // LinesCodec keeps discarding until the next newline
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    return Ok(Some(Err(ProxyError::MessageTooLarge(self.max_length))));
                }
                // The offending line has already been consumed
                Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                    return Ok(Some(Err(ProxyError::Transport(format!(
                        "Line is not valid UTF-8: {}",
                        e
                    )))));
                }
                Err(LinesCodecError::Io(e)) => return Err(ProxyError::Io(e)),
            }
        }
    }
}

impl Decoder for JsonRpcCodec {
    type Item = Result<SessionMessage>;
    type Error = ProxyError;

    fn decode(&mut self, src: &mut BytesMut) -> std::result::Result<Option<Self::Item>, Self::Error> {
        self.next_frame(src, false)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> std::result::Result<Option<Self::Item>, Self::Error> {
        self.next_frame(src, true)
    }
}

impl Encoder<SessionMessage> for JsonRpcCodec {
    type Error = ProxyError;

    fn encode(&mut self, item: SessionMessage, dst: &mut BytesMut) -> Result<()> {
        let json = serde_json::to_vec(&item.message)?;
        dst.reserve(json.len() + 1);
        dst.put_slice(&json);
        dst.put_u8(b'\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestId;

    fn decode_all(codec: &mut JsonRpcCodec, buf: &mut BytesMut) -> Vec<Result<SessionMessage>> {
        let mut items = Vec::new();
        while let Some(item) = codec.decode(buf).unwrap() {
            items.push(item);
        }
        items
    }

    #[test]
    fn test_decode_multiple_lines() {
        let mut codec = JsonRpcCodec::new(1024);
        let mut buf = BytesMut::from(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"a\"}\n{\"jsonrpc\":\"2.0\",\"method\":\"b\"}\r\n",
        );

        let items = decode_all(&mut codec, &mut buf);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().method(), Some("a"));
        assert_eq!(items[1].as_ref().unwrap().method(), Some("b"));
    }

    #[test]
    fn test_partial_line_waits_for_newline() {
        let mut codec = JsonRpcCodec::new(1024);
        let mut buf = BytesMut::from("{\"jsonrpc\":\"2.0\",\"method\":");
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"\"ping\"}\n");
        let item = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(item.unwrap().method(), Some("ping"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut codec = JsonRpcCodec::new(1024);
        let mut buf = BytesMut::from("\n  \n{\"jsonrpc\":\"2.0\",\"method\":\"x\"}\n");
        let items = decode_all(&mut codec, &mut buf);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_invalid_line_does_not_end_stream() {
        let mut codec = JsonRpcCodec::new(1024);
        let mut buf = BytesMut::from(
            "not json\n{\"jsonrpc\":\"1.0\",\"method\":\"old\"}\n{\"jsonrpc\":\"2.0\",\"method\":\"ok\"}\n",
        );

        let items = decode_all(&mut codec, &mut buf);
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], Err(ProxyError::Json(_))));
        assert!(matches!(items[1], Err(ProxyError::Transport(_))));
        assert_eq!(items[2].as_ref().unwrap().method(), Some("ok"));
    }

    #[test]
    fn test_non_utf8_line_does_not_end_stream() {
        let mut codec = JsonRpcCodec::new(1024);
        let mut buf = BytesMut::from(&b"\xff\xfe\n{\"jsonrpc\":\"2.0\",\"method\":\"after\"}\n"[..]);

        let items = decode_all(&mut codec, &mut buf);
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Err(ProxyError::Transport(_))));
        assert_eq!(items[1].as_ref().unwrap().method(), Some("after"));
    }

    #[test]
    fn test_oversized_line_is_reported_once() {
        let mut codec = JsonRpcCodec::new(32);
        let long = format!("{{\"jsonrpc\":\"2.0\",\"method\":\"{}\"}}\n", "x".repeat(64));
        let mut buf = BytesMut::from(long.as_str());
        buf.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"method\":\"y\"}\n");

        let items = decode_all(&mut codec, &mut buf);
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Err(ProxyError::MessageTooLarge(32))));
        assert_eq!(items[1].as_ref().unwrap().method(), Some("y"));
    }

    #[test]
    fn test_decode_eof_without_trailing_newline() {
        let mut codec = JsonRpcCodec::new(1024);
        let mut buf = BytesMut::from("{\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{}}");
        assert!(codec.decode(&mut buf).unwrap().is_none());

        let item = codec.decode_eof(&mut buf).unwrap().unwrap();
        assert_eq!(item.unwrap().id(), Some(&RequestId::from(2)));
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_encode_appends_newline() {
        let mut codec = JsonRpcCodec::new(1024);
        let mut buf = BytesMut::new();
        codec
            .encode(SessionMessage::notification("ping", None), &mut buf)
            .unwrap();

        assert_eq!(&buf[..], b"{\"jsonrpc\":\"2.0\",\"method\":\"ping\"}\n");
    }
}
