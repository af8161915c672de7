//! Canonical, provider-agnostic types shared by every codec and adapter.
//!
//! Everything here is a plain value: a `Model` names a backend model, a
//! `Context` is the conversation sent to it, and a `Response` or a sequence of
//! `StreamChunk`s is what comes back once a provider reply has been
//! normalized.

pub mod embedding;
pub mod json;
pub mod usage;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use usage::Usage;

// ---------- Model ----------

/// A backend model, identified by provider id and provider-side model name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Model {
    pub provider: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid model specifier `{spec}`: expected `provider:model`")]
pub struct ModelSpecError {
    pub spec: String,
}

impl Model {
    pub fn new(provider: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            name: name.into(),
            capabilities: None,
        }
    }

    /// Parse a `provider:name` specifier. Only the first colon separates the
    /// provider, so model names such as `meta/llama:free` survive intact.
    pub fn parse(spec: &str) -> Result<Self, ModelSpecError> {
        let err = || ModelSpecError {
            spec: spec.to_string(),
        };
        let (provider, name) = spec.split_once(':').ok_or_else(err)?;
        let (provider, name) = (provider.trim(), name.trim());
        if provider.is_empty() || name.is_empty() {
            return Err(err());
        }
        Ok(Self::new(provider, name))
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = Some(capabilities.into_iter().map(Into::into).collect());
        self
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities
            .as_ref()
            .is_some_and(|caps| caps.contains(capability))
    }
}

impl FromStr for Model {
    type Err = ModelSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.name)
    }
}

// ---------- Operation ----------

/// The kind of call being prepared. Providers advertise which ones they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Chat,
    Embedding,
    /// Structured output: a chat call constrained by a response format.
    Object,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Chat => "chat",
            Operation::Embedding => "embedding",
            Operation::Object => "object",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------- Messages ----------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One piece of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    /// Assistant requests a tool invocation.
    ToolCall {
        call_id: String,
        name: String,
        #[serde(default = "empty_object")]
        input: JsonValue,
    },
    /// Output of a tool, answering `call_id`. Strings are sent verbatim,
    /// anything else is serialized to JSON text.
    ToolResult {
        call_id: String,
        output: JsonValue,
    },
    /// Inline file or image bytes.
    Binary {
        media_type: String,
        #[serde(with = "serde_bytes")]
        data: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },
    /// Remote image reference.
    ImageUrl {
        url: String,
    },
    /// Model reasoning returned by some backends. Kept for inspection only.
    Thinking {
        text: String,
    },
}

fn empty_object() -> JsonValue {
    JsonValue::Object(JsonMap::new())
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn tool_call(call_id: impl Into<String>, name: impl Into<String>, input: JsonValue) -> Self {
        ContentPart::ToolCall {
            call_id: call_id.into(),
            name: name.into(),
            input,
        }
    }

    pub fn tool_result(call_id: impl Into<String>, output: impl Into<JsonValue>) -> Self {
        ContentPart::ToolResult {
            call_id: call_id.into(),
            output: output.into(),
        }
    }

    pub fn binary(media_type: impl Into<String>, data: Vec<u8>) -> Self {
        ContentPart::Binary {
            media_type: media_type.into(),
            data,
            filename: None,
        }
    }
}

/// Fresh id for a tool call the backend left unnamed.
pub fn new_tool_call_id() -> String {
    format!("call_{}", uuid::Uuid::new_v4().simple())
}

/// Message-level tool call (the OpenAI legacy shape).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default = "empty_object")]
    pub arguments: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: Vec<ContentPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Message {
    pub fn new(role: Role, content: Vec<ContentPart>) -> Self {
        Self {
            role,
            content,
            tool_calls: None,
        }
    }

    pub fn system<S: Into<String>>(s: S) -> Self {
        Self::new(Role::System, vec![ContentPart::text(s)])
    }

    pub fn user<S: Into<String>>(s: S) -> Self {
        Self::new(Role::User, vec![ContentPart::text(s)])
    }

    pub fn assistant<S: Into<String>>(s: S) -> Self {
        Self::new(Role::Assistant, vec![ContentPart::text(s)])
    }

    pub fn tool_result(call_id: impl Into<String>, output: impl Into<JsonValue>) -> Self {
        Self::new(Role::Tool, vec![ContentPart::tool_result(call_id, output)])
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = Some(tool_calls);
        self
    }

    /// Concatenate all text parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Tool calls from both accepted input shapes: the message-level
    /// `tool_calls` field first, then `tool_call` content parts whose id was
    /// not already listed.
    pub fn all_tool_calls(&self) -> Vec<ToolCall> {
        let mut out: Vec<ToolCall> = self.tool_calls.clone().unwrap_or_default();
        for part in &self.content {
            if let ContentPart::ToolCall {
                call_id,
                name,
                input,
            } = part
            {
                if out.iter().any(|tc| &tc.id == call_id) {
                    continue;
                }
                out.push(ToolCall {
                    id: call_id.clone(),
                    name: name.clone(),
                    arguments: input.clone(),
                });
            }
        }
        out
    }
}

// ---------- Context ----------

/// Structural problems found in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("message {index}: tool messages must carry at least one tool_result part")]
    ToolMessageWithoutResult { index: usize },
    #[error("message {index}: tool_result part has an empty call_id")]
    EmptyToolResultId { index: usize },
    #[error("message {index}: tool call has an empty name")]
    EmptyToolName { index: usize },
    #[error("message {index}: system messages may only contain text")]
    NonTextSystemMessage { index: usize },
}

/// Ordered conversation. Appending returns a new context; the original is
/// never modified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    messages: Vec<Message>,
}

impl Context {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn with_message(&self, message: Message) -> Self {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend(self.messages.iter().cloned());
        messages.push(message);
        Self { messages }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn validate(&self) -> Result<(), ContextError> {
        for (index, message) in self.messages.iter().enumerate() {
            match message.role {
                Role::Tool => {
                    let mut has_result = false;
                    for part in &message.content {
                        if let ContentPart::ToolResult { call_id, .. } = part {
                            if call_id.trim().is_empty() {
                                return Err(ContextError::EmptyToolResultId { index });
                            }
                            has_result = true;
                        }
                    }
                    if !has_result {
                        return Err(ContextError::ToolMessageWithoutResult { index });
                    }
                }
                Role::System => {
                    if message
                        .content
                        .iter()
                        .any(|p| !matches!(p, ContentPart::Text { .. }))
                    {
                        return Err(ContextError::NonTextSystemMessage { index });
                    }
                }
                Role::User | Role::Assistant => {}
            }
            if message
                .all_tool_calls()
                .iter()
                .any(|tc| tc.name.trim().is_empty())
            {
                return Err(ContextError::EmptyToolName { index });
            }
        }
        Ok(())
    }
}

impl From<Vec<Message>> for Context {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

// ---------- Tools ----------

/// A callable function exposed to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema of the arguments.
    #[serde(
        default = "empty_object",
        alias = "parameter_schema",
        alias = "input_schema"
    )]
    pub parameters: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl Tool {
    pub fn new(name: impl Into<String>, parameters: JsonValue) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters,
            strict: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ---------- Responses ----------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Unknown,
}

/// Sentinel used when a backend omits the response id.
pub const UNKNOWN_RESPONSE_ID: &str = "unknown";

/// A normalized, non-streaming reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    pub id: String,
    pub model: String,
    pub message: Message,
    pub finish_reason: Option<FinishReason>,
    pub usage: Usage,
    /// The request context with `message` appended.
    pub context: Context,
    #[serde(default)]
    pub stream: bool,
}

impl Response {
    pub fn text(&self) -> String {
        self.message.text()
    }

    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.message.all_tool_calls()
    }
}

/// One normalized unit of streamed output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamChunk {
    Content {
        text: String,
    },
    Thinking {
        text: String,
    },
    /// A complete or partial tool call. `metadata` carries `index`, the call
    /// `id` when the backend sent one, and `arguments_raw` with the argument
    /// text exactly as received.
    ToolCall {
        name: String,
        arguments: JsonValue,
        #[serde(default)]
        metadata: JsonMap<String, JsonValue>,
    },
    Finish {
        reason: FinishReason,
    },
    Usage {
        usage: Usage,
    },
    Error {
        message: String,
    },
}

impl StreamChunk {
    pub fn content(text: impl Into<String>) -> Self {
        StreamChunk::Content { text: text.into() }
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod types_tests;
