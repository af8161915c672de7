#[path = "../crates/sdk-types/src/lib.rs"]
pub mod types;
#[path = "../crates/core/src/lib.rs"]
pub mod core;
#[path = "../crates/options/src/lib.rs"]
pub mod options;
#[path = "../crates/streaming-sse/src/lib.rs"]
pub mod streaming_sse;
#[path = "../crates/provider/src/lib.rs"]
pub mod provider;
#[path = "../crates/transports/reqwest/src/lib.rs"]
pub mod transport_reqwest;

#[path = "../crates/providers/openai-compatible/src/lib.rs"]
pub mod provider_openai_compatible;
#[path = "../crates/providers/openai/src/lib.rs"]
pub mod provider_openai;
#[path = "../crates/providers/openrouter/src/lib.rs"]
pub mod provider_openrouter;
#[path = "../crates/providers/groq/src/lib.rs"]
pub mod provider_groq;
#[path = "../crates/providers/vllm/src/lib.rs"]
pub mod provider_vllm;

pub mod transports {
    pub use crate::transport_reqwest as reqwest;
}

pub mod providers {
    pub use crate::provider_groq as groq;
    pub use crate::provider_openai as openai;
    pub use crate::provider_openai_compatible as openai_compatible;
    pub use crate::provider_openrouter as openrouter;
    pub use crate::provider_vllm as vllm;
}

pub use crate::core::{SdkError, ValidationError};
pub use crate::options::{OptionSet, ProcessedOptions};
pub use crate::provider::{CallOutput, Client, ProviderAdapter, ProviderConfig, ProviderRegistry};
pub use crate::types::{Context, Message, Model, Operation, Response, StreamChunk};

pub(crate) use crate::core as ai_codec_core;
pub(crate) use crate::options as ai_codec_options;
pub(crate) use crate::provider as ai_codec_provider;
pub(crate) use crate::streaming_sse as ai_codec_streaming_sse;
pub(crate) use crate::transport_reqwest as reqwest_transport;
pub(crate) use crate::types as ai_codec_types;
