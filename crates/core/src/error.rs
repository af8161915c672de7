use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::ai_codec_options::PROVIDER_OPTIONS_KEY;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },
    /// The exchange could not be completed (connect failure, broken stream).
    #[error("api request failed: {reason}")]
    ApiRequest {
        reason: String,
        #[source]
        source: Option<Box<TransportError>>,
    },
    /// The backend answered, but not with something we can use.
    #[error("api response error (status {status}): {reason}")]
    ApiResponse {
        status: u16,
        /// Raw upstream body. May contain sensitive data; log with
        /// [`display_body_for_error`].
        body: String,
        reason: String,
    },
    #[error("unknown error: {message}")]
    Unknown {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SdkError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        SdkError::InvalidParameter {
            message: message.into(),
        }
    }

    /// Error for a non-2xx status. The body is kept verbatim and never parsed.
    pub fn api_response(status: u16, body: impl Into<String>) -> Self {
        SdkError::ApiResponse {
            status,
            body: body.into(),
            reason: http_status_reason(status),
        }
    }

    /// Error for a 2xx reply whose body does not have the expected shape.
    pub fn malformed_response(status: u16, body: impl Into<String>, what: &str) -> Self {
        SdkError::ApiResponse {
            status,
            body: body.into(),
            reason: format!("unrecognized response body: {what}"),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::ApiResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn raw_body(&self) -> Option<&str> {
        match self {
            SdkError::ApiResponse { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            SdkError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

impl From<TransportError> for SdkError {
    fn from(err: TransportError) -> Self {
        SdkError::ApiRequest {
            reason: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Unknown {
            message: format!("serde error: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

/// Hint attached to an unknown-option error. Purely informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// The keys are valid provider options and belong under `provider_options`.
    NestUnderProviderOptions { keys: Vec<String> },
    DidYouMean { key: String, candidate: String },
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::NestUnderProviderOptions { keys } => write!(
                f,
                "{} provider-specific; nest under `{PROVIDER_OPTIONS_KEY}`: {}",
                if keys.len() == 1 { "this key is" } else { "these keys are" },
                quoted_list(keys)
            ),
            Suggestion::DidYouMean { key, candidate } => {
                write!(f, "`{key}`: did you mean `{candidate}`?")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("provider schema redefines core option(s): {}", quoted_list(.keys))]
    Collision { keys: Vec<String> },
    #[error("unknown option(s) {}{}", quoted_list(.keys), hint_suffix(.hints))]
    UnknownOptions {
        keys: Vec<String>,
        hints: Vec<Suggestion>,
    },
    #[error("option `{key}` expected {expected}, got {value}")]
    InvalidType {
        key: String,
        expected: String,
        value: Value,
    },
    #[error("missing required option `{key}`")]
    MissingRequired { key: String },
    #[error("unsupported option(s): {}", .warnings.join("; "))]
    Unsupported { warnings: Vec<String> },
}

fn quoted_list(keys: &[String]) -> String {
    keys.iter()
        .map(|k| format!("`{k}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn hint_suffix(hints: &[Suggestion]) -> String {
    if hints.is_empty() {
        return String::new();
    }
    let joined = hints
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!(" ({joined})")
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network: {0}")]
    Network(String),
    #[error("connect timeout after {0:?}")]
    ConnectTimeout(Duration),
    #[error("idle read timeout after {0:?}")]
    IdleReadTimeout(Duration),
    #[error("body read error: {0}")]
    BodyRead(String),
    #[error("stream closed")]
    StreamClosed,
    #[error("other: {0}")]
    Other(String),
}

pub fn http_status_reason(status: u16) -> String {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("http status {status}"))
}

/// Short, log-safe rendering of an upstream body.
pub fn display_body_for_error(body: &str) -> String {
    let trimmed = body.trim();
    let looks_like_json = trimmed.starts_with('{') || trimmed.starts_with('[');
    if looks_like_json {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(v) => v.to_string(),
            Err(_) => format!("{} bytes", body.len()),
        }
    } else {
        format!("{} bytes", body.len())
    }
}
