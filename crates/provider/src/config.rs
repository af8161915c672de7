/// Per-provider connection settings supplied by the application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Overrides the adapter's default base URL.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    /// Extra headers. `content-type`, `accept` and `authorization` are
    /// managed by the codec and ignored here.
    pub headers: Vec<(String, String)>,
    pub query_params: Vec<(String, String)>,
}

impl ProviderConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }
}

/// API key for a call: the configured key, else the adapter's environment
/// variable, else none. Blank values count as missing.
pub fn resolve_api_key(config: &ProviderConfig, env_var: Option<&str>) -> Option<String> {
    let non_blank = |s: String| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };
    config
        .api_key
        .clone()
        .and_then(non_blank)
        .or_else(|| env_var.and_then(|name| std::env::var(name).ok()).and_then(non_blank))
}
