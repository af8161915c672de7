use serde_json::{Map, Value};

use crate::ai_codec_core::SdkError;
use crate::ai_codec_types::json::decode_tool_arguments;
use crate::ai_codec_types::usage::from_openai;
use crate::ai_codec_types::{
    new_tool_call_id, ContentPart, Context, Message, Model, Response, Role, Usage,
    UNKNOWN_RESPONSE_ID,
};

use crate::provider_openai_compatible::finish_reason::map_finish_reason;

/// Reasoning text some servers return next to `content`.
pub(crate) fn reasoning_text(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("reasoning_content")
        .or_else(|| obj.get("reasoning"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn text_content(content: Option<&Value>) -> Option<String> {
    match content? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(parts) => {
            let joined: String = parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect();
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

fn tool_call_part(raw: &Value) -> Option<ContentPart> {
    let function = raw.get("function")?;
    let name = function.get("name").and_then(Value::as_str)?.to_string();
    let call_id = raw
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(new_tool_call_id);
    Some(ContentPart::ToolCall {
        call_id,
        name,
        input: decode_tool_arguments(function.get("arguments")),
    })
}

/// Decode the assistant message of a chat reply.
pub fn decode_message(message: &Map<String, Value>) -> Message {
    let mut content = Vec::new();
    if let Some(thinking) = reasoning_text(message) {
        content.push(ContentPart::Thinking {
            text: thinking.to_string(),
        });
    }
    if let Some(text) = text_content(message.get("content")) {
        content.push(ContentPart::Text { text });
    }
    if let Some(Value::Array(calls)) = message.get("tool_calls") {
        content.extend(calls.iter().filter_map(tool_call_part));
    }
    // Legacy single-function shape.
    if let Some(call) = message.get("function_call").filter(|v| v.is_object()) {
        let wrapped = serde_json::json!({"function": call});
        content.extend(tool_call_part(&wrapped));
    }
    Message::new(Role::Assistant, content)
}

/// Decode a non-streaming `/chat/completions` reply.
///
/// Non-2xx statuses become `ApiResponse` with the body left as-is. A 2xx
/// body without `choices[0].message` is also rejected; anything finer
/// grained (missing id, usage or finish reason) falls back to defaults.
pub fn decode_chat_response(status: u16, body: &[u8], model: &Model, context: &Context) -> Result<Response, SdkError> {
    let text = String::from_utf8_lossy(body);
    if !(200..300).contains(&status) {
        return Err(SdkError::api_response(status, text));
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| SdkError::malformed_response(status, &*text, &e.to_string()))?;
    let Some(choice) = value
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
    else {
        return Err(SdkError::malformed_response(status, text, "missing choices"));
    };
    let Some(message) = choice.get("message").and_then(Value::as_object) else {
        return Err(SdkError::malformed_response(status, text, "missing choices[0].message"));
    };

    let message = decode_message(message);
    let usage = value
        .get("usage")
        .and_then(from_openai)
        .unwrap_or_else(Usage::default);
    Ok(Response {
        id: value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_RESPONSE_ID)
            .to_string(),
        model: value
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(&model.name)
            .to_string(),
        finish_reason: map_finish_reason(choice.get("finish_reason").and_then(Value::as_str)),
        usage,
        context: context.with_message(message.clone()),
        message,
        stream: false,
    })
}

/// Usage block of a reply body, zeroed when absent.
pub fn extract_usage(body: &Value) -> Usage {
    body.get("usage").and_then(from_openai).unwrap_or_default()
}
