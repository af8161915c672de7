pub mod error;
pub mod json;
pub mod stream_collect;
pub mod transport;

pub use crate::core::error::{SdkError, Suggestion, TransportError, ValidationError};
pub use crate::core::stream_collect::{
    collect_stream_to_response, StreamCollector, StreamCollectorConfig,
};
pub use crate::core::transport::{
    ByteStream, HttpTransport, StreamingWireResponse, TransportConfig, WireRequest, WireResponse,
};

#[cfg(test)]
#[path = "../tests/json_tests.rs"]
mod json_tests;
