use serde_json::Value;
use std::sync::{Arc, OnceLock};

use crate::ai_codec_core::SdkError;
use crate::ai_codec_options::{
    OptionKind, OptionSet, OptionSpec, Schema, Translated, EMBEDDING_PROVIDER_KEYS,
    PROVIDER_OPTIONS_KEY,
};
use crate::ai_codec_provider::ProviderAdapter;
use crate::ai_codec_types::{Model, Operation};

const DEFAULT_BASE_URL: &str = "http://localhost:8000/v1";
const OPERATIONS: &[Operation] = &[Operation::Chat, Operation::Object, Operation::Embedding];

/// Mutually exclusive guided-decoding modes, in precedence order.
pub const GUIDED_DECODING_KEYS: &[&str] =
    &["guided_json", "guided_regex", "guided_choice", "guided_grammar"];

const ENCODING_FORMATS: &[&str] = &["float", "base64"];

static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();

pub fn vllm_schema() -> Arc<Schema> {
    Arc::clone(SCHEMA.get_or_init(|| {
        use OptionKind as K;
        Arc::new(
            Schema::new()
                .with(OptionSpec::new("guided_json", K::OneOf(vec![K::Map, K::String])).doc("JSON schema to follow."))
                .with(OptionSpec::new("guided_regex", K::String))
                .with(OptionSpec::new("guided_choice", K::list_of(K::String)))
                .with(OptionSpec::new("guided_grammar", K::String).doc("Context-free grammar."))
                .with(OptionSpec::new("min_p", K::Float))
                .with(OptionSpec::new("repetition_penalty", K::Float))
                .with(OptionSpec::new("best_of", K::NonNegativeInteger))
                .with(OptionSpec::new("dimensions", K::NonNegativeInteger).doc("Embedding size."))
                .with(OptionSpec::new("encoding_format", K::Enum(ENCODING_FORMATS))),
        )
    }))
}

/// Local vLLM servers usually run without auth, so no key is looked up
/// unless one is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct VllmProvider;

impl ProviderAdapter for VllmProvider {
    fn provider_id(&self) -> &str {
        "vllm"
    }

    fn default_base_url(&self) -> &str {
        DEFAULT_BASE_URL
    }

    fn api_key_env(&self) -> Option<&str> {
        Some("VLLM_API_KEY")
    }

    fn provider_schema(&self) -> Option<Arc<Schema>> {
        Some(vllm_schema())
    }

    fn supported_operations(&self) -> &[Operation] {
        OPERATIONS
    }

    fn translate_options(
        &self,
        operation: Operation,
        _model: &Model,
        options: OptionSet,
    ) -> Result<Translated, SdkError> {
        let mut out = Translated::passthrough(options);
        if operation == Operation::Embedding {
            return Ok(out);
        }
        out.drop_provider_options(EMBEDDING_PROVIDER_KEYS, "only used for embeddings");
        let Some(Value::Object(provider)) = out.options.get_mut(PROVIDER_OPTIONS_KEY) else {
            return Ok(out);
        };
        let present: Vec<&str> = GUIDED_DECODING_KEYS
            .iter()
            .copied()
            .filter(|k| provider.contains_key(*k))
            .collect();
        if let [kept, rest @ ..] = present.as_slice() {
            for key in rest {
                provider.remove(*key);
            }
            let dropped: Vec<String> = rest.iter().map(|k| format!("`{k}`")).collect();
            if !dropped.is_empty() {
                out.warn(format!(
                    "{} dropped: only one guided decoding mode is allowed, keeping `{kept}`",
                    dropped.join(", ")
                ));
            }
        }
        Ok(out)
    }
}
