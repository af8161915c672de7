use crate::ai_codec_core::error::{display_body_for_error, TransportError};
use crate::ai_codec_core::json::without_null_fields;
use crate::ai_codec_core::transport::{
    HttpTransport, StreamingWireResponse, TransportConfig, WireRequest, WireResponse,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::Value;
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tracing::debug;

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    fn configure_builder(
        mut builder: reqwest::ClientBuilder,
        cfg: &TransportConfig,
    ) -> reqwest::ClientBuilder {
        builder = builder
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .pool_idle_timeout(Duration::from_secs(90));
        if let Some(req_timeout) = cfg.request_timeout {
            builder = builder.timeout(req_timeout);
        }
        builder.connect_timeout(cfg.connect_timeout)
    }

    fn try_new_with_builder(
        cfg: &TransportConfig,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, TransportError> {
        let builder = Self::configure_builder(builder, cfg);
        let client = builder.build().map_err(|err| {
            TransportError::Other(format!(
                "reqwest client build failed: {}",
                format_reqwest_error_chain(&err)
            ))
        })?;
        Ok(Self { client })
    }

    pub fn try_new(cfg: &TransportConfig) -> Result<Self, TransportError> {
        Self::try_new_with_builder(cfg, Client::builder())
    }

    /// Wrap an existing client, e.g. one shared with the rest of an application.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn build(&self, request: &WireRequest, cfg: &TransportConfig) -> reqwest::RequestBuilder {
        let body: Value = if cfg.strip_null_fields {
            without_null_fields(&request.body)
        } else {
            request.body.clone()
        };
        let mut req = self.client.post(&request.url).json(&body);
        for (k, v) in &request.headers {
            // .json() already sets it
            if !k.eq_ignore_ascii_case("content-type") {
                req = req.header(k, v);
            }
        }
        req
    }

    async fn dispatch(
        &self,
        request: &WireRequest,
        cfg: &TransportConfig,
    ) -> Result<reqwest::Response, TransportError> {
        let started = Instant::now();
        match self.build(request, cfg).send().await {
            Ok(resp) => {
                debug!(
                    target: "ai_codec::transport::reqwest",
                    url = %request.url,
                    status = resp.status().as_u16(),
                    latency_ms = started.elapsed().as_millis() as u64,
                    "response received"
                );
                Ok(resp)
            }
            Err(e) => {
                let detail = format_reqwest_error_chain(&e);
                debug!(target: "ai_codec::transport::reqwest", %detail, "reqwest send failed");
                Err(if e.is_connect() {
                    TransportError::Network(format!("connect: {detail}"))
                } else if e.is_timeout() {
                    TransportError::ConnectTimeout(cfg.connect_timeout)
                } else {
                    TransportError::Network(detail)
                })
            }
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &WireRequest,
        cfg: &TransportConfig,
    ) -> Result<WireResponse, TransportError> {
        let resp = self.dispatch(request, cfg).await?;
        let status = resp.status().as_u16();
        let headers = header_pairs(resp.headers());
        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::BodyRead(e.to_string()))?;
        if !(200..300).contains(&status) {
            debug!(
                target: "ai_codec::transport::reqwest",
                status,
                body = %display_body_for_error(&String::from_utf8_lossy(&body)),
                "non-success status"
            );
        }
        Ok(WireResponse {
            status,
            headers,
            body,
        })
    }

    async fn send_stream(
        &self,
        request: &WireRequest,
        cfg: &TransportConfig,
    ) -> Result<StreamingWireResponse, TransportError> {
        let resp = self.dispatch(request, cfg).await?;
        let status = resp.status().as_u16();
        let headers = header_pairs(resp.headers());
        let idle = cfg.idle_read_timeout;
        let mut inner = resp.bytes_stream();

        let s = async_stream::try_stream! {
            loop {
                let next = tokio::time::timeout(idle, inner.next()).await;
                match next {
                    Err(_) => Err(TransportError::IdleReadTimeout(idle))?,
                    Ok(None) => break,
                    Ok(Some(Err(e))) => {
                        if e.is_timeout() { Err(TransportError::IdleReadTimeout(idle))?; }
                        else { Err(TransportError::BodyRead(e.to_string()))?; }
                    }
                    Ok(Some(Ok(bytes))) => { yield bytes; }
                }
            }
        };
        Ok(StreamingWireResponse {
            status,
            headers,
            body: Box::pin(s),
        })
    }
}

fn header_pairs(headers: &http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
        .collect()
}

fn format_reqwest_error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(src) = current {
        out.push_str(": ");
        out.push_str(&src.to_string());
        current = src.source();
    }
    out
}
