use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use serde_json::{json, Map, Value};

use crate::ai_codec_types::json::encode_tool_arguments;
use crate::ai_codec_types::{ContentPart, Context, Message, Role};

/// `input_audio` formats the chat endpoint accepts inline.
fn audio_format(media_type: &str) -> Option<&'static str> {
    match media_type {
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        _ => None,
    }
}

fn data_url(media_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, B64.encode(data))
}

/// Wire form of a content part, or `None` for parts that never go into
/// `content` (tool calls, tool results, thinking).
fn encode_part(part: &ContentPart) -> Option<Value> {
    match part {
        ContentPart::Text { text } => Some(json!({"type": "text", "text": text})),
        ContentPart::ImageUrl { url } => Some(json!({"type": "image_url", "image_url": {"url": url}})),
        ContentPart::Binary {
            media_type,
            data,
            filename,
        } => {
            if media_type.starts_with("image/") {
                return Some(json!({
                    "type": "image_url",
                    "image_url": {"url": data_url(media_type, data)}
                }));
            }
            if let Some(format) = audio_format(media_type) {
                return Some(json!({
                    "type": "input_audio",
                    "input_audio": {"data": B64.encode(data), "format": format}
                }));
            }
            let mut file = Map::new();
            if let Some(name) = filename {
                file.insert("filename".into(), Value::String(name.clone()));
            }
            file.insert("file_data".into(), Value::String(data_url(media_type, data)));
            Some(json!({"type": "file", "file": file}))
        }
        ContentPart::ToolCall { .. } | ContentPart::ToolResult { .. } | ContentPart::Thinking { .. } => None,
    }
}

/// `content` for one message: a bare string for exactly one text part,
/// otherwise an array with one entry per encodable part (possibly empty).
pub fn encode_content(parts: &[ContentPart]) -> Value {
    let encodable: Vec<&ContentPart> = parts.iter().filter(|p| encode_part(p).is_some()).collect();
    if let [ContentPart::Text { text }] = encodable.as_slice() {
        return Value::String(text.clone());
    }
    Value::Array(encodable.into_iter().filter_map(encode_part).collect())
}

fn tool_result_text(output: &Value) -> String {
    match output {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn encode_tool_results(message: &Message, out: &mut Vec<Value>) {
    for part in &message.content {
        if let ContentPart::ToolResult { call_id, output } = part {
            out.push(json!({
                "role": "tool",
                "tool_call_id": call_id,
                "content": tool_result_text(output),
            }));
        }
    }
}

fn encode_message(message: &Message) -> Value {
    let mut obj = Map::new();
    obj.insert("role".into(), Value::String(message.role.as_str().to_string()));
    obj.insert("content".into(), encode_content(&message.content));
    let tool_calls = message.all_tool_calls();
    if !tool_calls.is_empty() {
        let wire: Vec<Value> = tool_calls
            .iter()
            .map(|tc| {
                json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": encode_tool_arguments(&tc.arguments),
                    }
                })
            })
            .collect();
        obj.insert("tool_calls".into(), Value::Array(wire));
    }
    Value::Object(obj)
}

/// Encode a conversation as a chat `messages` array.
///
/// `system_prompt` becomes a leading system message. Tool results become one
/// `role: "tool"` message each, placed right after the message carrying them.
pub fn encode_messages(context: &Context, system_prompt: Option<&str>) -> Vec<Value> {
    let mut out = Vec::with_capacity(context.len() + 1);
    if let Some(prompt) = system_prompt {
        out.push(json!({"role": "system", "content": prompt}));
    }
    for message in context {
        let has_results = message
            .content
            .iter()
            .any(|p| matches!(p, ContentPart::ToolResult { .. }));
        let has_other = message
            .content
            .iter()
            .any(|p| !matches!(p, ContentPart::ToolResult { .. }))
            || message.tool_calls.as_ref().is_some_and(|tc| !tc.is_empty());
        if message.role != Role::Tool && (has_other || !has_results) {
            out.push(encode_message(message));
        }
        encode_tool_results(message, &mut out);
    }
    out
}
