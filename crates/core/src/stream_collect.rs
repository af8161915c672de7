use std::collections::BTreeMap;

use futures_core::Stream;
use futures_util::StreamExt;
use serde_json::Value as JsonValue;

use crate::ai_codec_types::json::decode_tool_arguments;
use crate::ai_codec_types::{
    new_tool_call_id, ContentPart, Context, FinishReason, Message, Response, Role, StreamChunk,
    Usage, UNKNOWN_RESPONSE_ID,
};
use crate::core::SdkError;

/// Controls how stream chunks are collapsed into a `Response`.
#[derive(Debug, Clone, Copy)]
pub struct StreamCollectorConfig {
    /// Keep thinking chunks as a `thinking` content part.
    pub allow_thinking: bool,
    /// When true, an error chunk aborts collection.
    pub fail_on_error: bool,
}

impl Default for StreamCollectorConfig {
    fn default() -> Self {
        Self {
            allow_thinking: true,
            fail_on_error: false,
        }
    }
}

#[derive(Debug, Default)]
struct PartialToolCall {
    id: Option<String>,
    name: String,
    arguments_raw: String,
    arguments: Option<JsonValue>,
}

/// Folds `StreamChunk`s into the pieces of a `Response`.
///
/// Tool-call fragments are grouped by their `index` metadata and their raw
/// argument text is concatenated before parsing, so calls split over many
/// events come out whole.
#[derive(Debug, Default)]
pub struct StreamCollector {
    cfg: StreamCollectorConfig,
    text: String,
    thinking: String,
    tool_calls: BTreeMap<u64, PartialToolCall>,
    finish_reason: Option<FinishReason>,
    usage: Option<Usage>,
    errors: Vec<String>,
}

impl StreamCollector {
    pub fn new(cfg: StreamCollectorConfig) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn push(&mut self, chunk: StreamChunk) -> Result<(), SdkError> {
        match chunk {
            StreamChunk::Content { text } => self.text.push_str(&text),
            StreamChunk::Thinking { text } => {
                if self.cfg.allow_thinking {
                    self.thinking.push_str(&text);
                }
            }
            StreamChunk::ToolCall {
                name,
                arguments,
                metadata,
            } => {
                let index = metadata
                    .get("index")
                    .and_then(JsonValue::as_u64)
                    .unwrap_or(self.tool_calls.len() as u64);
                let slot = self.tool_calls.entry(index).or_default();
                if let Some(id) = metadata.get("id").and_then(JsonValue::as_str) {
                    slot.id.get_or_insert_with(|| id.to_string());
                }
                if slot.name.is_empty() && !name.is_empty() {
                    slot.name = name;
                }
                match metadata.get("arguments_raw").and_then(JsonValue::as_str) {
                    Some(raw) => slot.arguments_raw.push_str(raw),
                    None => {
                        if arguments.as_object().is_some_and(|m| !m.is_empty()) {
                            slot.arguments = Some(arguments);
                        }
                    }
                }
            }
            StreamChunk::Finish { reason } => self.finish_reason = Some(reason),
            StreamChunk::Usage { usage } => self.usage = Some(usage),
            StreamChunk::Error { message } => {
                if self.cfg.fail_on_error {
                    return Err(SdkError::ApiRequest {
                        reason: format!("stream error: {message}"),
                        source: None,
                    });
                }
                tracing::warn!(target: "ai_codec::stream", error = %message, "error chunk in stream");
                self.errors.push(message);
            }
        }
        Ok(())
    }

    /// Error messages seen while `fail_on_error` was off.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_response(self, id: Option<String>, model: &str, context: &Context) -> Response {
        let mut content = Vec::new();
        if !self.thinking.is_empty() {
            content.push(ContentPart::Thinking {
                text: self.thinking,
            });
        }
        if !self.text.is_empty() {
            content.push(ContentPart::Text { text: self.text });
        }
        for (_, call) in self.tool_calls {
            let input = if call.arguments_raw.is_empty() {
                call.arguments
                    .unwrap_or_else(|| decode_tool_arguments(None))
            } else {
                decode_tool_arguments(Some(&JsonValue::String(call.arguments_raw)))
            };
            content.push(ContentPart::ToolCall {
                call_id: call.id.unwrap_or_else(new_tool_call_id),
                name: call.name,
                input,
            });
        }
        let message = Message::new(Role::Assistant, content);
        Response {
            id: id.unwrap_or_else(|| UNKNOWN_RESPONSE_ID.to_string()),
            model: model.to_string(),
            context: context.with_message(message.clone()),
            message,
            finish_reason: self.finish_reason,
            usage: self.usage.unwrap_or_default(),
            stream: true,
        }
    }
}

/// Drain a chunk stream into a `Response`.
pub async fn collect_stream_to_response<S>(
    stream: S,
    cfg: StreamCollectorConfig,
    model: &str,
    context: &Context,
) -> Result<Response, SdkError>
where
    S: Stream<Item = Result<StreamChunk, SdkError>>,
{
    let mut collector = StreamCollector::new(cfg);
    futures_util::pin_mut!(stream);
    while let Some(item) = stream.next().await {
        collector.push(item?)?;
    }
    Ok(collector.into_response(None, model, context))
}
