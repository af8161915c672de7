use std::sync::{Arc, OnceLock};

use crate::ai_codec_options::{OptionKind, OptionSpec, Schema};

pub const SERVICE_TIERS: &[&str] = &["auto", "default", "flex", "priority"];
pub const ENCODING_FORMATS: &[&str] = &["float", "base64"];

static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();

/// Options accepted under `provider_options` for OpenAI.
pub fn openai_schema() -> Arc<Schema> {
    Arc::clone(SCHEMA.get_or_init(|| {
        use OptionKind as K;
        Arc::new(
            Schema::new()
                .with(OptionSpec::new("logprobs", K::Boolean))
                .with(OptionSpec::new("top_logprobs", K::NonNegativeInteger).doc("0 to 20."))
                .with(OptionSpec::new("service_tier", K::Enum(SERVICE_TIERS)))
                .with(OptionSpec::new("parallel_tool_calls", K::Boolean))
                .with(OptionSpec::new("prediction", K::Map).doc("Predicted output content."))
                .with(OptionSpec::new("store", K::Boolean))
                .with(OptionSpec::new("metadata", K::Map))
                .with(OptionSpec::new("dimensions", K::NonNegativeInteger).doc("Embedding size."))
                .with(OptionSpec::new("encoding_format", K::Enum(ENCODING_FORMATS))),
        )
    }))
}
