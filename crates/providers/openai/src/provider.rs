use std::sync::Arc;

use crate::ai_codec_core::SdkError;
use crate::ai_codec_options::{OptionSet, Schema, Translated, EMBEDDING_PROVIDER_KEYS};
use crate::ai_codec_provider::ProviderAdapter;
use crate::ai_codec_types::{Model, Operation};

use crate::provider_openai::options::openai_schema;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const OPERATIONS: &[Operation] = &[Operation::Chat, Operation::Object, Operation::Embedding];

/// Model families that take `max_completion_tokens` and reject sampling
/// parameters.
pub fn is_reasoning_model(model_id: &str) -> bool {
    model_id.starts_with("o1") || model_id.starts_with("o3") || model_id.starts_with("o4")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAIProvider;

impl ProviderAdapter for OpenAIProvider {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn default_base_url(&self) -> &str {
        DEFAULT_BASE_URL
    }

    fn api_key_env(&self) -> Option<&str> {
        Some("OPENAI_API_KEY")
    }

    fn provider_schema(&self) -> Option<Arc<Schema>> {
        Some(openai_schema())
    }

    fn supported_operations(&self) -> &[Operation] {
        OPERATIONS
    }

    fn translate_options(
        &self,
        operation: Operation,
        model: &Model,
        options: OptionSet,
    ) -> Result<Translated, SdkError> {
        let mut out = Translated::passthrough(options);
        if operation == Operation::Embedding {
            return Ok(out);
        }

        out.drop_option("top_k", "not supported by OpenAI");
        if is_reasoning_model(&model.name) {
            out.rename_option(
                "max_tokens",
                "max_completion_tokens",
                "reasoning models take max_completion_tokens",
            );
            out.drop_option("temperature", "not supported for reasoning models");
            out.drop_option("top_p", "not supported for reasoning models");
        }

        // Embedding-only keys would be rejected by /chat/completions.
        out.drop_provider_options(EMBEDDING_PROVIDER_KEYS, "only used for embeddings");
        Ok(out)
    }
}
