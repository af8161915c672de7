use serde_json::{Map, Value as JsonValue};

use crate::ai_codec_streaming_sse::SseEvent;
use crate::ai_codec_types::json::decode_tool_arguments;
use crate::ai_codec_types::usage::from_openai;
use crate::ai_codec_types::{Model, StreamChunk};

use crate::provider_openai_compatible::chat::response::reasoning_text;
use crate::provider_openai_compatible::error::error_message;
use crate::provider_openai_compatible::finish_reason::map_finish_reason;

/// Decode one SSE event. `[DONE]`, empty and unparsable payloads yield
/// nothing.
pub fn decode_event(event: &SseEvent, model: &Model) -> Vec<StreamChunk> {
    if event.is_done() {
        return Vec::new();
    }
    decode_data(&event.data_str(), model)
}

/// Decode one raw `data:` payload.
pub fn decode_data(data: &str, model: &Model) -> Vec<StreamChunk> {
    let data = data.trim();
    if data.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<JsonValue>(data) {
        Ok(value) => decode_payload(&value, model),
        Err(e) => {
            tracing::debug!(
                target: "ai_codec::stream",
                provider = %model.provider,
                error = %e,
                "skipping malformed stream payload"
            );
            Vec::new()
        }
    }
}

fn tool_call_chunk(position: usize, raw: &JsonValue) -> Option<StreamChunk> {
    let raw = raw.as_object()?;
    let function = raw.get("function").and_then(JsonValue::as_object);
    let name = function
        .and_then(|f| f.get("name"))
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();
    let wire_args = function.and_then(|f| f.get("arguments"));

    let mut metadata = Map::new();
    let index = raw
        .get("index")
        .and_then(JsonValue::as_u64)
        .unwrap_or(position as u64);
    metadata.insert("index".into(), JsonValue::from(index));
    if let Some(id) = raw.get("id").and_then(JsonValue::as_str) {
        metadata.insert("id".into(), JsonValue::String(id.to_string()));
    }
    if let Some(JsonValue::String(fragment)) = wire_args {
        metadata.insert("arguments_raw".into(), JsonValue::String(fragment.clone()));
    }
    Some(StreamChunk::ToolCall {
        name,
        arguments: decode_tool_arguments(wire_args),
        metadata,
    })
}

/// Decode an already parsed payload. Stateless: each call looks at one
/// event only.
pub fn decode_payload(payload: &JsonValue, _model: &Model) -> Vec<StreamChunk> {
    let Some(obj) = payload.as_object() else {
        return Vec::new();
    };
    if let Some(message) = error_message(payload) {
        return vec![StreamChunk::Error { message }];
    }

    let mut chunks = Vec::new();
    let choices = obj.get("choices").and_then(JsonValue::as_array);
    for choice in choices.into_iter().flatten() {
        if let Some(delta) = choice.get("delta").and_then(JsonValue::as_object) {
            if let Some(text) = reasoning_text(delta) {
                chunks.push(StreamChunk::Thinking {
                    text: text.to_string(),
                });
            }
            if let Some(text) = delta
                .get("content")
                .and_then(JsonValue::as_str)
                .filter(|s| !s.is_empty())
            {
                chunks.push(StreamChunk::content(text));
            }
            if let Some(JsonValue::Array(calls)) = delta.get("tool_calls") {
                chunks.extend(
                    calls
                        .iter()
                        .enumerate()
                        .filter_map(|(i, raw)| tool_call_chunk(i, raw)),
                );
            }
        }
        if let Some(reason) = map_finish_reason(choice.get("finish_reason").and_then(JsonValue::as_str)) {
            chunks.push(StreamChunk::Finish { reason });
        }
    }

    if let Some(usage) = obj.get("usage").and_then(from_openai) {
        chunks.push(StreamChunk::Usage { usage });
    }
    chunks
}
