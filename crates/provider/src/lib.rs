//! Provider adapters and the glue that drives them.
//!
//! A [`ProviderAdapter`] describes one backend: where it lives, which extra
//! options it accepts, how it rewrites options per model, and how its wire
//! format differs from the OpenAI-compatible baseline. Every hook has a
//! default, so a plain OpenAI-compatible server needs only an id and a URL.

pub mod client;
pub mod config;
pub mod registry;

use serde_json::{Map as JsonMap, Value as JsonValue};
use std::sync::Arc;
use url::Url;

use crate::ai_codec_core::json::splice_all_absent;
use crate::ai_codec_core::transport::{WireRequest, WireResponse};
use crate::ai_codec_core::SdkError;
use crate::ai_codec_options::{OptionSet, ProcessedOptions, Schema, Translated, PROVIDER_OPTIONS_KEY};
use crate::ai_codec_streaming_sse::SseEvent;
use crate::ai_codec_types::embedding::EmbeddingResponse;
use crate::ai_codec_types::{Context, Message, Model, Operation, Response, StreamChunk, Usage};
use crate::provider_openai_compatible::chat::request::encode_chat_body;
use crate::provider_openai_compatible::chat::response::{decode_chat_response, extract_usage};
use crate::provider_openai_compatible::embedding::{decode_embedding_response, encode_embedding_body};
use crate::provider_openai_compatible::stream::decode_event;

pub use client::{CallOutput, ChunkStream, Client};
pub use config::{resolve_api_key, ProviderConfig};
pub use registry::{ProviderRegistry, RegisteredProvider};

pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
pub const EMBEDDINGS_PATH: &str = "/embeddings";

/// What the caller wants generated from.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestInput {
    Context(Context),
    /// A single user turn. Appended to the `context` option when one is set.
    Prompt(String),
    /// Embedding inputs.
    Texts(Vec<String>),
}

impl From<Context> for RequestInput {
    fn from(context: Context) -> Self {
        RequestInput::Context(context)
    }
}

impl From<&str> for RequestInput {
    fn from(prompt: &str) -> Self {
        RequestInput::Prompt(prompt.to_string())
    }
}

/// Input after it has been matched against the operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Chat(Context),
    Embedding(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub request: WireRequest,
    /// Conversation sent, for building the response context.
    pub context: Context,
}

pub trait ProviderAdapter: Send + Sync {
    fn provider_id(&self) -> &str;

    fn default_base_url(&self) -> &str;

    /// Environment variable consulted when no API key is configured.
    fn api_key_env(&self) -> Option<&str> {
        None
    }

    /// Schema of the options accepted under `provider_options`.
    fn provider_schema(&self) -> Option<Arc<Schema>> {
        None
    }

    fn supported_provider_options(&self) -> Vec<String> {
        self.provider_schema()
            .map(|s| s.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn supported_operations(&self) -> &[Operation] {
        &[Operation::Chat, Operation::Object]
    }

    /// Rewrite validated options for one call. Must not perform I/O.
    fn translate_options(
        &self,
        _operation: Operation,
        _model: &Model,
        options: OptionSet,
    ) -> Result<Translated, SdkError> {
        Ok(Translated::passthrough(options))
    }

    fn endpoint(&self, operation: Operation) -> &str {
        match operation {
            Operation::Embedding => EMBEDDINGS_PATH,
            Operation::Chat | Operation::Object => CHAT_COMPLETIONS_PATH,
        }
    }

    fn encode_body(
        &self,
        model: &Model,
        payload: &Payload,
        options: &OptionSet,
    ) -> Result<JsonMap<String, JsonValue>, SdkError> {
        match payload {
            Payload::Chat(context) => encode_chat_body(model, context, options),
            Payload::Embedding(input) => encode_embedding_body(model, input, options),
        }
    }

    /// Adjust the encoded request. Must be idempotent and must not replace
    /// anything the encoder wrote. The default splices `provider_options`
    /// into chat bodies.
    fn post_process(
        &self,
        operation: Operation,
        request: &mut WireRequest,
        options: &OptionSet,
    ) -> Result<(), SdkError> {
        if operation == Operation::Embedding {
            return Ok(());
        }
        if let (JsonValue::Object(body), Some(JsonValue::Object(extra))) =
            (&mut request.body, options.get(PROVIDER_OPTIONS_KEY))
        {
            splice_all_absent(body, extra, &["model", "messages"]);
        }
        Ok(())
    }

    fn decode_response(
        &self,
        response: &WireResponse,
        model: &Model,
        context: &Context,
    ) -> Result<Response, SdkError> {
        decode_chat_response(response.status, &response.body, model, context)
    }

    fn decode_embedding(
        &self,
        response: &WireResponse,
        model: &Model,
    ) -> Result<EmbeddingResponse, SdkError> {
        decode_embedding_response(response.status, &response.body, model)
    }

    fn decode_stream_event(&self, event: &SseEvent, model: &Model) -> Vec<StreamChunk> {
        decode_event(event, model)
    }

    fn extract_usage(&self, body: &JsonValue, _model: &Model) -> Usage {
        extract_usage(body)
    }

    /// Validate the call shape, encode the body and assemble the request.
    fn prepare_request(
        &self,
        operation: Operation,
        model: &Model,
        input: RequestInput,
        options: &ProcessedOptions,
        config: &ProviderConfig,
    ) -> Result<PreparedRequest, SdkError> {
        let supported = self.supported_operations();
        if !supported.contains(&operation) {
            let names: Vec<&str> = supported.iter().map(Operation::as_str).collect();
            return Err(SdkError::invalid_parameter(format!(
                "operation `{operation}` is not supported by provider `{}` (supported: {})",
                self.provider_id(),
                names.join(", ")
            )));
        }
        if !registry::same_provider(&model.provider, self.provider_id()) {
            return Err(SdkError::invalid_parameter(format!(
                "model `{model}` does not belong to provider `{}`",
                self.provider_id()
            )));
        }
        if operation == Operation::Object
            && options
                .options
                .get("response_format")
                .map_or(true, JsonValue::is_null)
        {
            return Err(SdkError::invalid_parameter(
                "object generation requires the `response_format` option",
            ));
        }

        let payload = resolve_payload(operation, input, options.context.as_ref())?;
        let body = self.encode_body(model, &payload, &options.options)?;
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.default_base_url());
        let url = build_url(base_url, self.endpoint(operation), &config.query_params, self.provider_id())?;

        let mut request = WireRequest::new(url, JsonValue::Object(body));
        let streaming = options.options.get("stream") == Some(&JsonValue::Bool(true));
        request.set_header("content-type", "application/json");
        request.set_header(
            "accept",
            if streaming { "text/event-stream" } else { "application/json" },
        );
        if let Some(key) = resolve_api_key(config, self.api_key_env()) {
            request.set_header("authorization", format!("Bearer {key}"));
        }
        for (k, v) in &config.headers {
            let kl = k.to_ascii_lowercase();
            if matches!(kl.as_str(), "content-type" | "accept" | "authorization") {
                continue;
            }
            request.set_header(kl, v.clone());
        }
        request.set_header_if_absent("user-agent", user_agent(self.provider_id()));

        self.post_process(operation, &mut request, &options.options)?;

        let context = match payload {
            Payload::Chat(context) => context,
            Payload::Embedding(_) => Context::default(),
        };
        Ok(PreparedRequest { request, context })
    }
}

fn user_agent(provider_id: &str) -> String {
    format!("ai-codec/{provider_id}/{}", env!("CARGO_PKG_VERSION"))
}

/// Match the input against the operation.
pub fn resolve_payload(
    operation: Operation,
    input: RequestInput,
    option_context: Option<&Context>,
) -> Result<Payload, SdkError> {
    match (operation, input) {
        (Operation::Embedding, RequestInput::Texts(texts)) => Ok(Payload::Embedding(texts)),
        (Operation::Embedding, RequestInput::Prompt(text)) => Ok(Payload::Embedding(vec![text])),
        (Operation::Embedding, RequestInput::Context(_)) => Err(SdkError::invalid_parameter(
            "embedding input must be text, not a conversation",
        )),
        (_, RequestInput::Context(context)) => {
            context
                .validate()
                .map_err(|e| SdkError::invalid_parameter(format!("invalid context: {e}")))?;
            Ok(Payload::Chat(context))
        }
        (_, RequestInput::Prompt(prompt)) => {
            let base = option_context.cloned().unwrap_or_default();
            Ok(Payload::Chat(base.with_message(Message::user(prompt))))
        }
        (op, RequestInput::Texts(_)) => Err(SdkError::invalid_parameter(format!(
            "operation `{op}` takes a prompt or a conversation, not a list of texts"
        ))),
    }
}

fn build_url(
    base_url: &str,
    path: &str,
    query_params: &[(String, String)],
    provider_id: &str,
) -> Result<String, SdkError> {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(SdkError::invalid_parameter(format!(
            "provider `{provider_id}` requires base_url"
        )));
    }
    let mut url = Url::parse(&format!("{base}{path}")).map_err(|e| {
        SdkError::invalid_parameter(format!("invalid base_url `{base_url}` for `{provider_id}`: {e}"))
    })?;
    if !query_params.is_empty() {
        url.query_pairs_mut().extend_pairs(query_params.iter());
    }
    Ok(url.to_string())
}

#[cfg(test)]
#[path = "../tests/adapter_tests.rs"]
mod adapter_tests;

#[cfg(test)]
#[path = "../tests/client_tests.rs"]
mod client_tests;
