use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::providers::error::ProviderError;

const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event_type: Option<String>,
    pub data: String,
}

impl SseEvent {
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event_type: None,
            data: data.into(),
        }
    }

    /// OpenAI-compatible servers end the stream with `data: [DONE]`.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.data.trim() == DONE_SENTINEL
    }
}

/// Incremental `text/event-stream` decoder.
///
/// Bytes are buffered until a full line is available, so multi-byte UTF-8
/// sequences split across network chunks decode intact.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    current_event_type: Option<String>,
    data_lines: Vec<String>,
}

impl SseParser {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            current_event_type: None,
            data_lines: Vec::new(),
        }
    }

    pub fn process_chunk(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();

        while let Some(line_end) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&raw[..line_end]);
            let line = line.trim_end_matches('\r');

            if line.is_empty() {
                if !self.data_lines.is_empty() {
                    events.push(SseEvent {
                        event_type: self.current_event_type.take(),
                        data: self.data_lines.join("\n"),
                    });
                    self.data_lines.clear();
                }
            } else if line.starts_with(':') {
                // keep-alive comment
            } else if let Some(event_type) = line.strip_prefix("event:") {
                self.current_event_type = Some(event_type.trim().to_string());
            } else if let Some(data) = line.strip_prefix("data:") {
                self.data_lines.push(data.trim_start().to_string());
            }
        }

        events
    }

    /// Decodes a response body into events. A transport error is yielded once
    /// as a `StreamError`.
    pub fn parse_stream<S>(byte_stream: S) -> impl Stream<Item = Result<SseEvent, ProviderError>>
    where
        S: Stream<Item = Result<Bytes, reqwest::Error>>,
    {
        byte_stream
            .scan(Self::new(), |parser, chunk| {
                let items: Vec<Result<SseEvent, ProviderError>> = match chunk {
                    Ok(bytes) => parser.process_chunk(&bytes).into_iter().map(Ok).collect(),
                    Err(e) => vec![Err(ProviderError::StreamError(e.to_string()))],
                };
                futures::future::ready(Some(stream::iter(items)))
            })
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_data_event() {
        let mut parser = SseParser::new();
        let events = parser.process_chunk(b"data: hello world\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "hello world");
        assert!(events[0].event_type.is_none());
    }

    #[test]
    fn test_event_with_type() {
        let mut parser = SseParser::new();
        let events = parser.process_chunk(b"event: message\ndata: hello\n\n");

        assert_eq!(events[0].event_type.as_deref(), Some("message"));
    }

    #[test]
    fn test_multi_line_data() {
        let mut parser = SseParser::new();
        let events = parser.process_chunk(b"data: line1\ndata: line2\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "line1\nline2");
    }

    #[test]
    fn test_chunked_input() {
        let mut parser = SseParser::new();

        assert!(parser.process_chunk(b"data: hel").is_empty());
        let events = parser.process_chunk(b"lo world\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "hello world");
    }

    #[test]
    fn test_split_utf8_sequence() {
        let mut parser = SseParser::new();
        let bytes = "data: héllo\n\n".as_bytes();
        let split = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;

        assert!(parser.process_chunk(&bytes[..split]).is_empty());
        let events = parser.process_chunk(&bytes[split..]);
        assert_eq!(events[0].data, "héllo");
    }

    #[test]
    fn test_done_sentinel() {
        let mut parser = SseParser::new();
        let events = parser.process_chunk(b"data: {\"a\":1}\n\ndata: [DONE]\n\n");

        assert_eq!(events.len(), 2);
        assert!(!events[0].is_done());
        assert!(events[1].is_done());
    }

    #[test]
    fn test_comments_ignored() {
        let mut parser = SseParser::new();
        let events = parser.process_chunk(b": ping\n\ndata: x\n\n");

        assert_eq!(events, vec![SseEvent::new("x")]);
    }

    #[tokio::test]
    async fn test_parse_stream_across_chunks() {
        let chunks: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from_static(b"data: one\n")),
            Ok(Bytes::from_static(b"\ndata: two\n\n")),
        ];

        let events: Vec<_> = SseParser::parse_stream(stream::iter(chunks))
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].as_ref().unwrap().data, "two");
    }
}
