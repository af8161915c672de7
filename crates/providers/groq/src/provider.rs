use serde_json::Value;
use std::sync::{Arc, OnceLock};

use crate::ai_codec_core::SdkError;
use crate::ai_codec_options::{OptionKind, OptionSet, OptionSpec, Schema, Translated};
use crate::ai_codec_provider::ProviderAdapter;
use crate::ai_codec_types::{Model, Operation};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();

pub fn groq_schema() -> Arc<Schema> {
    Arc::clone(SCHEMA.get_or_init(|| {
        use OptionKind as K;
        Arc::new(
            Schema::new()
                .with(OptionSpec::new("service_tier", K::Enum(&["on_demand", "flex", "auto"])))
                .with(
                    OptionSpec::new("reasoning_format", K::Enum(&["parsed", "raw", "hidden"]))
                        .doc("How reasoning models return their reasoning."),
                )
                .with(OptionSpec::new(
                    "reasoning_effort",
                    K::Enum(&["none", "default", "low", "medium", "high"]),
                )),
        )
    }))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GroqProvider;

impl ProviderAdapter for GroqProvider {
    fn provider_id(&self) -> &str {
        "groq"
    }

    fn default_base_url(&self) -> &str {
        DEFAULT_BASE_URL
    }

    fn api_key_env(&self) -> Option<&str> {
        Some("GROQ_API_KEY")
    }

    fn provider_schema(&self) -> Option<Arc<Schema>> {
        Some(groq_schema())
    }

    fn translate_options(
        &self,
        _operation: Operation,
        _model: &Model,
        options: OptionSet,
    ) -> Result<Translated, SdkError> {
        let mut out = Translated::passthrough(options);
        if out.options.get("n").and_then(Value::as_u64).is_some_and(|n| n > 1) {
            out.drop_option("n", "Groq returns a single choice");
        }
        out.drop_option("top_k", "not supported by Groq");
        Ok(out)
    }
}
