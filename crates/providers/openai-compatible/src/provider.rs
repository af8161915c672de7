use crate::ai_codec_provider::ProviderAdapter;
use crate::ai_codec_types::Operation;

const ALL_OPERATIONS: &[Operation] = &[Operation::Chat, Operation::Object, Operation::Embedding];

/// Generic adapter for any server speaking the OpenAI wire format.
///
/// The default instance has no base URL, so calls fail until one is
/// configured through `ProviderConfig::with_base_url`.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleProvider {
    id: String,
    base_url: String,
    api_key_env: Option<String>,
    embeddings: bool,
}

impl Default for OpenAICompatibleProvider {
    fn default() -> Self {
        Self::new("openai_compatible", "")
    }
}

impl OpenAICompatibleProvider {
    pub fn new(id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_url: base_url.into(),
            api_key_env: None,
            embeddings: true,
        }
    }

    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    /// Servers without an `/embeddings` route.
    pub fn without_embeddings(mut self) -> Self {
        self.embeddings = false;
        self
    }
}

impl ProviderAdapter for OpenAICompatibleProvider {
    fn provider_id(&self) -> &str {
        &self.id
    }

    fn default_base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key_env(&self) -> Option<&str> {
        self.api_key_env.as_deref()
    }

    fn supported_operations(&self) -> &[Operation] {
        if self.embeddings {
            ALL_OPERATIONS
        } else {
            &ALL_OPERATIONS[..2]
        }
    }
}
