use serde_json::json;
use std::sync::{Arc, OnceLock};

use crate::options::compose::PROVIDER_OPTIONS_KEY;
use crate::options::schema::{OptionKind, OptionSpec, Schema};

pub const ON_UNSUPPORTED_KEY: &str = "on_unsupported";

pub const TOOL_CHOICE_MODES: &[&str] = &["auto", "none", "required"];
pub const REASONING_EFFORTS: &[&str] = &["minimal", "low", "medium", "high"];
pub const RESPONSE_FORMATS: &[&str] = &["text", "json_object"];
pub const ON_UNSUPPORTED_POLICIES: &[&str] = &["warn", "error", "ignore"];

static CORE_SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();

/// Options every provider understands.
pub fn core_schema() -> Arc<Schema> {
    Arc::clone(CORE_SCHEMA.get_or_init(|| Arc::new(build_core_schema())))
}

fn build_core_schema() -> Schema {
    use OptionKind as K;
    Schema::new()
        .with(OptionSpec::new("temperature", K::Float).doc("Sampling temperature."))
        .with(OptionSpec::new("max_tokens", K::NonNegativeInteger).doc("Upper bound on generated tokens."))
        .with(OptionSpec::new("top_p", K::Float).doc("Nucleus sampling mass."))
        .with(OptionSpec::new("top_k", K::NonNegativeInteger).doc("Sample from the k most likely tokens."))
        .with(OptionSpec::new("frequency_penalty", K::Float))
        .with(OptionSpec::new("presence_penalty", K::Float))
        .with(OptionSpec::new("seed", K::Integer))
        .with(
            OptionSpec::new("stop", K::OneOf(vec![K::String, K::list_of(K::String)]))
                .doc("Stop sequence or sequences."),
        )
        .with(OptionSpec::new("tools", K::list_of(K::Map)).doc("Tool definitions."))
        .with(OptionSpec::new(
            "tool_choice",
            K::OneOf(vec![K::Enum(TOOL_CHOICE_MODES), K::String, K::Map]),
        ))
        .with(OptionSpec::new("n", K::NonNegativeInteger).doc("Number of choices to generate."))
        .with(OptionSpec::new("stream", K::Boolean))
        .with(OptionSpec::new("user", K::String).doc("End-user identifier."))
        .with(OptionSpec::new("system_prompt", K::String).doc("Prepended as a system message."))
        .with(
            OptionSpec::new("reasoning", K::OneOf(vec![K::Enum(REASONING_EFFORTS), K::Map]))
                .doc("Reasoning effort, or a provider reasoning object."),
        )
        .with(
            OptionSpec::new("response_format", K::OneOf(vec![K::Enum(RESPONSE_FORMATS), K::Map]))
                .doc("Output format; required for structured output."),
        )
        .with(
            OptionSpec::new(ON_UNSUPPORTED_KEY, K::Enum(ON_UNSUPPORTED_POLICIES))
                .default_value(json!("warn"))
                .doc("What to do with translation warnings."),
        )
        .with(OptionSpec::new(PROVIDER_OPTIONS_KEY, K::Map).doc("Provider-specific options."))
}
