//! OpenAI-compatible chat and embeddings codec.
//!
//! Every adapter in this crate defaults to this wire format; provider crates
//! only override what their server does differently.

pub mod error;
pub mod finish_reason;
pub mod provider;
pub mod stream;
pub mod chat {
    pub mod convert;
    pub mod prepare_tools;
    pub mod request;
    pub mod response;
}
pub mod embedding;

pub use chat::convert::{encode_content, encode_messages};
pub use chat::request::encode_chat_body;
pub use chat::response::{decode_chat_response, decode_message, extract_usage};
pub use embedding::{decode_embedding_response, encode_embedding_body};
pub use finish_reason::map_finish_reason;
pub use provider::OpenAICompatibleProvider;
pub use stream::{decode_data, decode_event, decode_payload};

#[cfg(test)]
#[path = "../tests/chat_convert_tests.rs"]
mod chat_convert_tests;

#[cfg(test)]
#[path = "../tests/chat_codec_tests.rs"]
mod chat_codec_tests;

#[cfg(test)]
#[path = "../tests/embedding_tests.rs"]
mod embedding_tests;

#[cfg(test)]
#[path = "../tests/stream_tests.rs"]
mod stream_tests;
