//! Incremental `text/event-stream` framing.
//!
//! [`SseDecoder`] turns arbitrarily split transport bytes into [`SseEvent`]s;
//! [`sse_events`] does the same over a byte stream. Interpreting the payload
//! is left to provider codecs.

use crate::ai_codec_core::error::TransportError;
use crate::ai_codec_core::transport::ByteStream;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use std::collections::VecDeque;

/// Sentinel payload OpenAI-compatible servers send after the last event.
pub const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: Bytes,
    pub id: Option<String>,
    /// Reconnection time in milliseconds.
    pub retry: Option<u64>,
}

impl SseEvent {
    pub fn data(data: impl Into<Bytes>) -> Self {
        Self {
            event: None,
            data: data.into(),
            id: None,
            retry: None,
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn data_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    pub fn is_done(&self) -> bool {
        self.data_str().trim() == DONE_SENTINEL
    }
}

#[derive(Debug, Default)]
struct PendingEvent {
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
    retry: Option<u64>,
}

impl PendingEvent {
    fn field(&mut self, name: &str, value: &str) {
        match name {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse() {
                    self.retry = Some(ms);
                }
            }
            _ => {}
        }
    }

    /// Events without any `data` line are discarded.
    fn take(&mut self) -> Option<SseEvent> {
        let pending = std::mem::take(self);
        if pending.data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event: pending.event,
            data: Bytes::from(pending.data.join("\n")),
            id: pending.id,
            retry: pending.retry,
        })
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Line-oriented SSE decoder. Accepts `\n`, `\r\n` and bare `\r` line
/// endings, including a `\r\n` pair split across two pushes.
#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    /// The previous byte was `\r`; a following `\n` belongs to it.
    after_cr: bool,
    pending: PendingEvent,
    ready: VecDeque<SseEvent>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and drain every event completed by them.
    pub fn push(&mut self, chunk: &[u8]) -> impl Iterator<Item = SseEvent> + '_ {
        for &byte in chunk {
            match byte {
                b'\n' if self.after_cr => self.after_cr = false,
                b'\n' => self.end_line(),
                b'\r' => {
                    self.end_line();
                    self.after_cr = true;
                }
                other => {
                    self.after_cr = false;
                    self.line.push(other);
                }
            }
        }
        self.ready.drain(..)
    }

    /// Flush a trailing event the server never terminated with a blank line.
    pub fn finish(&mut self) -> impl Iterator<Item = SseEvent> + '_ {
        if !self.line.is_empty() {
            self.end_line();
        }
        if let Some(event) = self.pending.take() {
            self.ready.push_back(event);
        }
        self.after_cr = false;
        self.ready.drain(..)
    }

    pub fn has_buffered_data(&self) -> bool {
        !self.line.is_empty() || !self.pending.is_empty()
    }

    fn end_line(&mut self) {
        let raw = std::mem::take(&mut self.line);
        if raw.is_empty() {
            if let Some(event) = self.pending.take() {
                self.ready.push_back(event);
            }
            return;
        }
        let line = String::from_utf8_lossy(&raw);
        if line.starts_with(':') {
            return;
        }
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name, value.strip_prefix(' ').unwrap_or(value)),
            None => (&*line, ""),
        };
        self.pending.field(name, value);
    }
}

/// Decode a transport byte stream into SSE events, flushing any trailing
/// event when the stream ends.
pub fn sse_events(body: ByteStream) -> impl Stream<Item = Result<SseEvent, TransportError>> + Send {
    async_stream::stream! {
        let mut decoder = SseDecoder::new();
        let mut body = body;
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => {
                    for event in decoder.push(&bytes) {
                        yield Ok(event);
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
        for event in decoder.finish() {
            yield Ok(event);
        }
    }
}

#[cfg(test)]
#[path = "../tests/decoder_tests.rs"]
mod decoder_tests;
