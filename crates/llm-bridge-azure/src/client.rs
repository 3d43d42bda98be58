//! Azure OpenAI [`Llm`] implementation.

use llm_bridge::{
    Capabilities, ChatRound, GenerateOptions, HistoryBuilder, Llm, LlmError, RetryExecutor,
    RoundReply, Tool, ToolSchema, run_tool_loop,
};
use llm_bridge_openai::{OpenAiFormat, WireMessage};
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::Arc;
use tracing::instrument;

use crate::config::AzureConfig;
use crate::wire;

/// Azure OpenAI client implementing [`Llm`].
///
/// Addresses a deployment under the resource endpoint; otherwise behaves
/// exactly like the OpenAI client, including replaying assistant tool-call
/// turns from memory so call/result pairs stay intact.
#[derive(Debug)]
pub struct AzureClient {
    config: AzureConfig,
    client: reqwest::Client,
    builder: HistoryBuilder<OpenAiFormat>,
}

impl AzureClient {
    /// Creates a client from configuration.
    pub fn new(config: AzureConfig) -> Self {
        let client = config.client.clone().unwrap_or_else(|| {
            let mut builder = reqwest::Client::builder();
            if let Some(timeout) = config.timeout {
                builder = builder.timeout(timeout);
            }
            builder.build().expect("failed to build HTTP client")
        });
        Self {
            config,
            client,
            builder: HistoryBuilder::new(OpenAiFormat),
        }
    }

    fn default_headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(&self.config.api_key)
                .map_err(|_| LlmError::Auth("API key contains invalid header characters".into()))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=…`
    fn completions_url(&self) -> String {
        let endpoint = self.config.endpoint.trim_end_matches('/');
        format!(
            "{endpoint}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.deployment, self.config.api_version
        )
    }

    async fn exchange(&self, request: &wire::Request<'_>) -> Result<RoundReply, LlmError> {
        let headers = self.default_headers()?;

        let response = self
            .client
            .post(self.completions_url())
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Http {
                status: e.status().map(|s| {
                    http::StatusCode::from_u16(s.as_u16())
                        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
                }),
                message: e.to_string(),
                retryable: e.is_connect() || e.is_timeout(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let http_status = http::StatusCode::from_u16(status.as_u16())
                .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
            return Err(wire::convert_error(http_status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::ResponseFormat {
                message: format!("failed to read Azure OpenAI response body: {e}"),
                raw: String::new(),
            })?;

        let api_response: wire::Response =
            serde_json::from_str(&body).map_err(|e| LlmError::ResponseFormat {
                message: format!("failed to parse Azure OpenAI response: {e}"),
                raw: body,
            })?;

        wire::parse_reply(api_response)
    }
}

impl ChatRound for AzureClient {
    type Turn = WireMessage;

    async fn round(
        &self,
        turns: &[WireMessage],
        tools: &[ToolSchema],
        options: &GenerateOptions,
    ) -> Result<RoundReply, LlmError> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        if let Some(system) = &options.system_message {
            messages.push(OpenAiFormat::system_message(system));
        }
        messages.extend_from_slice(turns);

        let request = wire::build_request(&self.config, messages, tools, options);

        match &self.config.retry {
            Some(policy) => {
                RetryExecutor::new(policy.clone())
                    .execute(|| self.exchange(&request))
                    .await
            }
            None => self.exchange(&request).await,
        }
    }
}

impl Llm for AzureClient {
    #[instrument(skip_all, fields(deployment = %self.config.deployment))]
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let turns = self.builder.build(prompt, options.memory.as_deref()).await;
        let reply = self.round(&turns, &[], options).await?;
        Ok(reply.text)
    }

    #[instrument(skip_all, fields(deployment = %self.config.deployment))]
    async fn generate_with_tools(
        &self,
        prompt: &str,
        tools: &[Arc<dyn Tool>],
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        run_tool_loop(&self.builder, self, prompt, tools, options).await
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            provider: "azure-openai",
            model: self.config.deployment.clone(),
            tools: true,
            streaming: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AzureClient {
        AzureClient::new(AzureConfig {
            api_key: "azure-key".into(),
            endpoint: "https://my-resource.openai.azure.com".into(),
            deployment: "gpt-4o-mini".into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_completions_url() {
        assert_eq!(
            client().completions_url(),
            "https://my-resource.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn test_completions_url_trailing_slash() {
        let client = AzureClient::new(AzureConfig {
            endpoint: "https://my-resource.openai.azure.com/".into(),
            deployment: "o3-mini".into(),
            api_version: "2024-10-21".into(),
            ..Default::default()
        });
        assert_eq!(
            client.completions_url(),
            "https://my-resource.openai.azure.com/openai/deployments/o3-mini/chat/completions?api-version=2024-10-21"
        );
    }

    #[test]
    fn test_default_headers() {
        let headers = client().default_headers().unwrap();
        assert_eq!(headers.get("api-key").unwrap(), "azure-key");
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        assert!(headers.get("authorization").is_none());
    }

    #[test]
    fn test_capabilities() {
        let caps = client().capabilities();
        assert_eq!(caps.provider, "azure-openai");
        assert_eq!(caps.model, "gpt-4o-mini");
        assert!(caps.tools);
        assert!(!caps.streaming);
    }
}
