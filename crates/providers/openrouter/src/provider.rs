use serde_json::Value;
use std::sync::{Arc, OnceLock};

use crate::ai_codec_core::json::splice_all_absent;
use crate::ai_codec_core::transport::WireRequest;
use crate::ai_codec_core::SdkError;
use crate::ai_codec_options::{OptionKind, OptionSet, OptionSpec, Schema, PROVIDER_OPTIONS_KEY};
use crate::ai_codec_provider::ProviderAdapter;
use crate::ai_codec_types::Operation;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Provider options sent as headers rather than body fields.
const HEADER_OPTIONS: &[(&str, &str)] = &[("app_referer", "HTTP-Referer"), ("app_title", "X-Title")];

static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();

pub fn openrouter_schema() -> Arc<Schema> {
    Arc::clone(SCHEMA.get_or_init(|| {
        use OptionKind as K;
        Arc::new(
            Schema::new()
                .with(OptionSpec::new("models", K::list_of(K::String)).doc("Fallback models, in order."))
                .with(OptionSpec::new("route", K::Enum(&["fallback"])))
                .with(OptionSpec::new("provider", K::Map).doc("Upstream provider preferences."))
                .with(OptionSpec::new("transforms", K::list_of(K::String)))
                .with(OptionSpec::new("top_a", K::Float))
                .with(OptionSpec::new("min_p", K::Float))
                .with(OptionSpec::new("repetition_penalty", K::Float))
                .with(OptionSpec::new("app_referer", K::String).doc("Sent as HTTP-Referer."))
                .with(OptionSpec::new("app_title", K::String).doc("Sent as X-Title.")),
        )
    }))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenRouterProvider;

impl ProviderAdapter for OpenRouterProvider {
    fn provider_id(&self) -> &str {
        "openrouter"
    }

    fn default_base_url(&self) -> &str {
        DEFAULT_BASE_URL
    }

    fn api_key_env(&self) -> Option<&str> {
        Some("OPENROUTER_API_KEY")
    }

    fn provider_schema(&self) -> Option<Arc<Schema>> {
        Some(openrouter_schema())
    }

    fn post_process(
        &self,
        _operation: Operation,
        request: &mut WireRequest,
        options: &OptionSet,
    ) -> Result<(), SdkError> {
        let Some(Value::Object(extra)) = options.get(PROVIDER_OPTIONS_KEY) else {
            return Ok(());
        };
        for (key, header) in HEADER_OPTIONS {
            if let Some(value) = extra.get(*key).and_then(Value::as_str) {
                request.set_header_if_absent(*header, value);
            }
        }
        if let Value::Object(body) = &mut request.body {
            splice_all_absent(body, extra, &["model", "messages", "app_referer", "app_title"]);
        }
        Ok(())
    }
}
