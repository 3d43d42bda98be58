//! Gemini [`Llm`] implementation.

use llm_bridge::{
    Capabilities, ChatRound, GenerateOptions, HistoryBuilder, Llm, LlmError, RetryExecutor,
    RoundReply, Tool, ToolSchema, run_tool_loop,
};
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::Arc;
use tracing::instrument;

use crate::config::GeminiConfig;
use crate::convert;
use crate::format::GeminiFormat;
use crate::types::{Content, Request};

/// Gemini client implementing [`Llm`] over the `generateContent` API.
#[derive(Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
    builder: HistoryBuilder<GeminiFormat>,
}

impl GeminiClient {
    /// Creates a client from configuration.
    pub fn new(config: GeminiConfig) -> Self {
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
            builder: HistoryBuilder::new(GeminiFormat),
        }
    }

    fn default_headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.config.api_key)
                .map_err(|_| LlmError::Auth("API key contains invalid header characters".into()))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// `{base}/v1beta/models/{model}:generateContent`
    fn generate_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/v1beta/models/{}:generateContent", self.config.model)
    }

    async fn exchange(&self, request: &Request<'_>) -> Result<RoundReply, LlmError> {
        let headers = self.default_headers()?;

        let response = self
            .client
            .post(self.generate_url())
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
            return Err(convert::convert_error(http_status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::ResponseFormat {
                message: format!("failed to read Gemini response body: {e}"),
                raw: String::new(),
            })?;

        let api_response: crate::types::Response =
            serde_json::from_str(&body).map_err(|e| LlmError::ResponseFormat {
                message: format!("failed to parse Gemini response: {e}"),
                raw: body,
            })?;

        convert::parse_reply(api_response)
    }
}

impl ChatRound for GeminiClient {
    type Turn = Content;

    async fn round(
        &self,
        turns: &[Content],
        tools: &[ToolSchema],
        options: &GenerateOptions,
    ) -> Result<RoundReply, LlmError> {
        let request = convert::build_request(turns.to_vec(), tools, options);

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

impl Llm for GeminiClient {
    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let turns = self.builder.build(prompt, options.memory.as_deref()).await;
        let reply = self.round(&turns, &[], options).await?;
        Ok(reply.text)
    }

    #[instrument(skip_all, fields(model = %self.config.model))]
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
            provider: "gemini",
            model: self.config.model.clone(),
            tools: true,
            streaming: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        let client = GeminiClient::new(GeminiConfig::default());
        assert_eq!(
            client.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_default_headers() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: "AIza-test".into(),
            ..Default::default()
        });
        let headers = client.default_headers().unwrap();
        assert_eq!(headers.get("x-goog-api-key").unwrap(), "AIza-test");
    }

    #[test]
    fn test_capabilities() {
        let client = GeminiClient::new(GeminiConfig {
            model: "gemini-2.0-pro".into(),
            ..Default::default()
        });
        let caps = client.capabilities();
        assert_eq!(caps.provider, "gemini");
        assert_eq!(caps.model, "gemini-2.0-pro");
        assert!(caps.tools);
    }
}
