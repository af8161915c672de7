use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ai_codec_core::{SdkError, ValidationError};
use crate::ai_codec_options::{
    compose, core_schema, process, ComposedSchema, OptionSet, ProcessedOptions,
};
use crate::ai_codec_types::{Model, Operation};
use crate::provider::ProviderAdapter;

/// Canonical form of a provider id: lowercase, with every run of
/// non-alphanumeric characters collapsed to `_`.
pub fn normalize_provider_id(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_sep = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_sep = false;
        } else if !last_sep {
            slug.push('_');
            last_sep = true;
        }
    }
    slug.trim_matches('_').to_string()
}

pub(crate) fn same_provider(a: &str, b: &str) -> bool {
    normalize_provider_id(a) == normalize_provider_id(b)
}

/// An adapter together with its composed option schema.
#[derive(Clone)]
pub struct RegisteredProvider {
    adapter: Arc<dyn ProviderAdapter>,
    schema: Arc<ComposedSchema>,
}

impl std::fmt::Debug for RegisteredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredProvider")
            .field("id", &self.adapter.provider_id())
            .finish_non_exhaustive()
    }
}

impl RegisteredProvider {
    pub fn new(adapter: Arc<dyn ProviderAdapter>) -> Self {
        let schema = compose(&core_schema(), adapter.provider_schema());
        if !schema.collisions().is_empty() {
            tracing::warn!(
                target: "ai_codec::provider",
                provider = adapter.provider_id(),
                keys = ?schema.collisions(),
                "provider schema redefines core options; calls will fail validation"
            );
        }
        Self {
            adapter,
            schema: Arc::new(schema),
        }
    }

    pub fn adapter(&self) -> &Arc<dyn ProviderAdapter> {
        &self.adapter
    }

    pub fn schema(&self) -> &ComposedSchema {
        &self.schema
    }

    /// Validate only, returning the schema-level error untouched.
    pub fn validate(&self, options: &OptionSet) -> Result<OptionSet, ValidationError> {
        crate::ai_codec_options::validate(options, &self.schema)
    }

    /// Validate and translate options for one call.
    pub fn process(
        &self,
        operation: Operation,
        model: &Model,
        options: OptionSet,
    ) -> Result<ProcessedOptions, SdkError> {
        let adapter = &self.adapter;
        process(&self.schema, operation, model, options, |op, m, o| {
            adapter.translate_options(op, m, o)
        })
    }
}

/// Adapters keyed by normalized provider id. Schemas are composed once, at
/// registration.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, RegisteredProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every adapter shipped with this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::providers::openai::OpenAIProvider));
        registry.register(Arc::new(crate::providers::openrouter::OpenRouterProvider));
        registry.register(Arc::new(crate::providers::groq::GroqProvider));
        registry.register(Arc::new(crate::providers::vllm::VllmProvider));
        registry.register(Arc::new(
            crate::providers::openai_compatible::OpenAICompatibleProvider::default(),
        ));
        registry
    }

    /// Register an adapter, returning the one it replaced.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) -> Option<RegisteredProvider> {
        let id = normalize_provider_id(adapter.provider_id());
        tracing::debug!(target: "ai_codec::provider", provider = %id, "registering provider");
        self.providers.insert(id, RegisteredProvider::new(adapter))
    }

    pub fn get(&self, provider_id: &str) -> Option<&RegisteredProvider> {
        self.providers.get(&normalize_provider_id(provider_id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn resolve(&self, model: &Model) -> Result<&RegisteredProvider, SdkError> {
        self.get(&model.provider).ok_or_else(|| {
            SdkError::invalid_parameter(format!(
                "unknown provider `{}` (registered: {})",
                model.provider,
                self.ids().collect::<Vec<_>>().join(", ")
            ))
        })
    }
}
