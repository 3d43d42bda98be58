//! Gemini client configuration.

use std::time::Duration;

use llm_bridge::RetryPolicy;

/// Configuration for the Gemini client.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Gemini API key. Required. Sent as the `x-goog-api-key` header.
    pub api_key: String,
    /// Model identifier (e.g. `"gemini-2.0-flash"`).
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout. `None` uses reqwest's default.
    pub timeout: Option<Duration>,
    /// Retry policy for the network round. `None` disables retries.
    pub retry: Option<RetryPolicy>,
    /// Pre-configured HTTP client for connection pooling across clients.
    pub client: Option<reqwest::Client>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("client", &self.client.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.0-flash".into(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            timeout: None,
            retry: None,
            client: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GeminiConfig {
            api_key: "AIza-secret".into(),
            ..Default::default()
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("AIza-secret"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
