use serde_json::{json, Map, Value};

use crate::ai_codec_core::json::insert_present;
use crate::ai_codec_core::SdkError;
use crate::ai_codec_options::OptionSet;
use crate::ai_codec_types::{Context, Model};

use crate::provider_openai_compatible::chat::convert::encode_messages;
use crate::provider_openai_compatible::chat::prepare_tools::{encode_tool_choice, encode_tools};

/// Options copied onto the body unchanged when set.
const PASSTHROUGH_FIELDS: &[&str] = &[
    "temperature",
    "max_tokens",
    "max_completion_tokens",
    "top_p",
    "top_k",
    "frequency_penalty",
    "presence_penalty",
    "seed",
    "n",
    "user",
    "stop",
];

fn encode_response_format(format: &Value) -> Value {
    match format {
        Value::String(kind) => json!({"type": kind}),
        other => other.clone(),
    }
}

/// Build a `/chat/completions` body from a context and translated options.
///
/// Only options that are set appear in the body; nothing is written as null.
pub fn encode_chat_body(model: &Model, context: &Context, options: &OptionSet) -> Result<Map<String, Value>, SdkError> {
    let system_prompt = options.get("system_prompt").and_then(Value::as_str);
    let mut body = Map::new();
    body.insert("model".into(), Value::String(model.name.clone()));
    body.insert(
        "messages".into(),
        Value::Array(encode_messages(context, system_prompt)),
    );

    for field in PASSTHROUGH_FIELDS {
        insert_present(&mut body, field, options.get(*field));
    }

    match options.get("reasoning") {
        Some(Value::String(effort)) => {
            body.insert("reasoning_effort".into(), Value::String(effort.clone()));
        }
        Some(v @ Value::Object(_)) => {
            body.insert("reasoning".into(), v.clone());
        }
        _ => {}
    }

    if let Some(format) = options.get("response_format").filter(|v| !v.is_null()) {
        body.insert("response_format".into(), encode_response_format(format));
    }

    if let Some(Value::Array(tools)) = options.get("tools") {
        if !tools.is_empty() {
            body.insert("tools".into(), Value::Array(encode_tools(tools)?));
        }
    }
    if let Some(choice) = options.get("tool_choice").filter(|v| !v.is_null()) {
        body.insert("tool_choice".into(), encode_tool_choice(choice));
    }

    if let Some(Value::Bool(stream)) = options.get("stream") {
        body.insert("stream".into(), Value::Bool(*stream));
        if *stream {
            body.insert("stream_options".into(), json!({"include_usage": true}));
        }
    }

    tracing::debug!(
        target: "ai_codec::codec",
        provider = %model.provider,
        model = %model.name,
        fields = body.len(),
        "encoded chat body"
    );
    Ok(body)
}
