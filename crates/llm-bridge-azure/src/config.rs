//! Azure OpenAI client configuration.

use std::time::Duration;

use llm_bridge::RetryPolicy;

/// Configuration for the Azure OpenAI client.
///
/// `endpoint` is the resource URL (`https://<resource>.openai.azure.com`)
/// and `deployment` names the model deployment; both are required.
#[derive(Clone)]
pub struct AzureConfig {
    /// Azure OpenAI API key. Required. Sent as the `api-key` header.
    pub api_key: String,
    /// Resource endpoint URL. Required.
    pub endpoint: String,
    /// Deployment name. Required. Reasoning-model sampling rules apply when
    /// the deployment is named after a reasoning model.
    pub deployment: String,
    /// API version query parameter.
    pub api_version: String,
    /// Request timeout. `None` uses reqwest's default.
    pub timeout: Option<Duration>,
    /// Retry policy for the network round. `None` disables retries.
    pub retry: Option<RetryPolicy>,
    /// Pre-configured HTTP client for connection pooling across clients.
    pub client: Option<reqwest::Client>,
}

impl std::fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("client", &self.client.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            deployment: String::new(),
            api_version: "2024-06-01".into(),
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
        let config = AzureConfig::default();
        assert_eq!(config.api_version, "2024-06-01");
        assert!(config.endpoint.is_empty());
        assert!(config.deployment.is_empty());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AzureConfig {
            api_key: "azure-secret".into(),
            ..Default::default()
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("azure-secret"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
