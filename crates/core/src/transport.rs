use crate::core::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Overall request timeout (optional; if None, rely on connect + idle)
    pub request_timeout: Option<Duration>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Per-chunk idle read timeout
    pub idle_read_timeout: Duration,
    /// Whether to strip object fields with null values from JSON bodies before sending
    pub strip_null_fields: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            connect_timeout: Duration::from_secs(10),
            idle_read_timeout: Duration::from_secs(45),
            strip_null_fields: true,
        }
    }
}

/// A fully encoded request, ready to be POSTed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl WireRequest {
    pub fn new(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add a header unless one with the same name is already set.
    pub fn set_header_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if self.header(&name).is_none() {
            self.headers.push((name, value.into()));
        }
    }

    /// Replace or add a header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }
}

/// Raw reply. Status is reported as-is; interpreting it is the codec's job.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

pub struct StreamingWireResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: ByteStream,
}

impl std::fmt::Debug for StreamingWireResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingWireResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a JSON body and buffer the full reply.
    ///
    /// Non-2xx statuses are not errors at this layer; only failures to
    /// complete the exchange are.
    async fn send(
        &self,
        request: &WireRequest,
        cfg: &TransportConfig,
    ) -> Result<WireResponse, TransportError>;

    /// POST a JSON body and hand back the reply body as a byte stream.
    async fn send_stream(
        &self,
        request: &WireRequest,
        cfg: &TransportConfig,
    ) -> Result<StreamingWireResponse, TransportError>;
}
