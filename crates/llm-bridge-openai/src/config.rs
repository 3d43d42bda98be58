//! OpenAI client configuration.

use std::time::Duration;

use llm_bridge::RetryPolicy;

/// Configuration for the OpenAI client.
///
/// Use struct update syntax with [`Default`] for ergonomic construction:
///
/// ```rust
/// use llm_bridge_openai::OpenAiConfig;
///
/// let config = OpenAiConfig {
///     api_key: "sk-...".into(),
///     model: "gpt-4o".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Clone)]
pub struct OpenAiConfig {
    /// OpenAI API key. Required.
    pub api_key: String,
    /// Model identifier (e.g. `"gpt-4o-mini"`, `"o3-mini"`).
    pub model: String,
    /// Base URL for the API. Override for proxies or compatible servers.
    pub base_url: String,
    /// Organization id, sent as the `openai-organization` header.
    pub organization: Option<String>,
    /// Request timeout. `None` uses reqwest's default.
    pub timeout: Option<Duration>,
    /// Retry policy for the network round. `None` disables retries.
    pub retry: Option<RetryPolicy>,
    /// Pre-configured HTTP client for connection pooling across clients.
    /// When `None`, a new client is created.
    pub client: Option<reqwest::Client>,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("client", &self.client.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            organization: None,
            timeout: None,
            retry: None,
            client: None,
        }
    }
}
