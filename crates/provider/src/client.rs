use futures_core::Stream;
use futures_util::StreamExt;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

use crate::ai_codec_core::transport::{HttpTransport, TransportConfig};
use crate::ai_codec_core::SdkError;
use crate::ai_codec_options::{normalize_aliases, OptionSet};
use crate::ai_codec_streaming_sse::sse_events;
use crate::ai_codec_types::embedding::EmbeddingResponse;
use crate::ai_codec_types::{Model, Operation, Response, StreamChunk};
use crate::provider::registry::{normalize_provider_id, ProviderRegistry, RegisteredProvider};
use crate::provider::{PreparedRequest, ProviderConfig, RequestInput};
use crate::reqwest_transport::ReqwestTransport;

const STREAM_KEY: &str = "stream";

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, SdkError>> + Send>>;

/// Result of a call together with the translation warnings it produced.
#[derive(Debug)]
pub struct CallOutput<T> {
    pub output: T,
    pub warnings: Vec<String>,
}

/// Drives registry → option pipeline → codec → transport for a call.
pub struct Client<T: HttpTransport = ReqwestTransport> {
    registry: Arc<ProviderRegistry>,
    transport: T,
    transport_cfg: TransportConfig,
    configs: HashMap<String, ProviderConfig>,
}

impl Client<ReqwestTransport> {
    /// Client over the built-in adapters and a reqwest transport.
    pub fn try_new() -> Result<Self, SdkError> {
        let cfg = TransportConfig::default();
        let transport = ReqwestTransport::try_new(&cfg)?;
        Ok(Self::with_transport(
            Arc::new(ProviderRegistry::with_builtin()),
            transport,
        ))
    }
}

impl<T: HttpTransport> Client<T> {
    pub fn with_transport(registry: Arc<ProviderRegistry>, transport: T) -> Self {
        Self {
            registry,
            transport,
            transport_cfg: TransportConfig::default(),
            configs: HashMap::new(),
        }
    }

    pub fn with_transport_config(mut self, cfg: TransportConfig) -> Self {
        self.transport_cfg = cfg;
        self
    }

    pub fn with_provider_config(mut self, provider_id: &str, config: ProviderConfig) -> Self {
        self.configs.insert(normalize_provider_id(provider_id), config);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn prepare(
        &self,
        operation: Operation,
        model: &Model,
        input: RequestInput,
        options: OptionSet,
    ) -> Result<(&RegisteredProvider, PreparedRequest, Vec<String>), SdkError> {
        let provider = self.registry.resolve(model)?;
        let processed = provider.process(operation, model, options)?;
        let default_config = ProviderConfig::default();
        let config = self
            .configs
            .get(&normalize_provider_id(&model.provider))
            .unwrap_or(&default_config);
        let prepared = provider
            .adapter()
            .prepare_request(operation, model, input, &processed, config)?;
        tracing::debug!(
            target: "ai_codec::client",
            provider = %model.provider,
            model = %model.name,
            operation = %operation,
            url = %prepared.request.url,
            "request prepared"
        );
        Ok((provider, prepared, processed.warnings))
    }

    async fn generate(
        &self,
        operation: Operation,
        model: &Model,
        input: RequestInput,
        mut options: OptionSet,
    ) -> Result<CallOutput<Response>, SdkError> {
        normalize_aliases(&mut options);
        match options.get(STREAM_KEY) {
            Some(JsonValue::Bool(true)) => {
                return Err(SdkError::invalid_parameter(format!(
                    "`{STREAM_KEY}: true` is not allowed on `{operation}` calls; use `stream_text`"
                )));
            }
            Some(JsonValue::Bool(false)) => {
                options.remove(STREAM_KEY);
            }
            // Anything else is left for validation to reject.
            _ => {}
        }
        let (provider, prepared, warnings) = self.prepare(operation, model, input, options)?;
        let response = self
            .transport
            .send(&prepared.request, &self.transport_cfg)
            .await?;
        let output = provider
            .adapter()
            .decode_response(&response, model, &prepared.context)?;
        Ok(CallOutput { output, warnings })
    }

    pub async fn generate_text(
        &self,
        model: &Model,
        input: impl Into<RequestInput>,
        options: OptionSet,
    ) -> Result<CallOutput<Response>, SdkError> {
        self.generate(Operation::Chat, model, input.into(), options)
            .await
    }

    /// Structured output; `options` must carry `response_format`.
    pub async fn generate_object(
        &self,
        model: &Model,
        input: impl Into<RequestInput>,
        options: OptionSet,
    ) -> Result<CallOutput<Response>, SdkError> {
        self.generate(Operation::Object, model, input.into(), options)
            .await
    }

    /// Start a streaming chat call. Dropping the returned stream cancels it.
    pub async fn stream_text(
        &self,
        model: &Model,
        input: impl Into<RequestInput>,
        mut options: OptionSet,
    ) -> Result<CallOutput<ChunkStream>, SdkError> {
        normalize_aliases(&mut options);
        options.insert(STREAM_KEY.into(), JsonValue::Bool(true));
        let (provider, prepared, warnings) =
            self.prepare(Operation::Chat, model, input.into(), options)?;
        let response = self
            .transport
            .send_stream(&prepared.request, &self.transport_cfg)
            .await?;

        if !(200..300).contains(&response.status) {
            let mut body = Vec::new();
            let mut bytes = response.body;
            while let Some(chunk) = bytes.next().await {
                body.extend_from_slice(&chunk?);
            }
            return Err(SdkError::api_response(
                response.status,
                String::from_utf8_lossy(&body),
            ));
        }

        let adapter = Arc::clone(provider.adapter());
        let model = model.clone();
        let events = sse_events(response.body);
        let chunks = async_stream::stream! {
            futures_util::pin_mut!(events);
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        for chunk in adapter.decode_stream_event(&event, &model) {
                            yield Ok(chunk);
                        }
                    }
                    Err(e) => {
                        yield Err(SdkError::from(e));
                        return;
                    }
                }
            }
        };
        Ok(CallOutput {
            output: Box::pin(chunks),
            warnings,
        })
    }

    pub async fn embed(
        &self,
        model: &Model,
        texts: Vec<String>,
        options: OptionSet,
    ) -> Result<CallOutput<EmbeddingResponse>, SdkError> {
        let (provider, prepared, warnings) = self.prepare(
            Operation::Embedding,
            model,
            RequestInput::Texts(texts),
            options,
        )?;
        let response = self
            .transport
            .send(&prepared.request, &self.transport_cfg)
            .await?;
        let output = provider.adapter().decode_embedding(&response, model)?;
        Ok(CallOutput { output, warnings })
    }
}
