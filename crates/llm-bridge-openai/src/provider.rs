//! OpenAI [`Llm`] implementation.

use llm_bridge::{
    Capabilities, ChatRound, GenerateOptions, HistoryBuilder, Llm, LlmError, RetryExecutor,
    RoundReply, Tool, ToolSchema, run_tool_loop,
};
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::config::OpenAiConfig;
use crate::convert;
use crate::format::OpenAiFormat;
use crate::types::{Request, WireMessage};

/// OpenAI client implementing [`Llm`] over the Chat Completions API.
///
/// # Example
///
/// ```rust,no_run
/// use llm_bridge::{GenerateOptions, Llm};
/// use llm_bridge_openai::{OpenAiClient, OpenAiConfig};
///
/// # async fn example() -> Result<(), llm_bridge::LlmError> {
/// let client = OpenAiClient::new(OpenAiConfig {
///     api_key: std::env::var("OPENAI_API_KEY").unwrap(),
///     ..Default::default()
/// });
///
/// let answer = client
///     .generate("Hello!", &GenerateOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: reqwest::Client,
    builder: HistoryBuilder<OpenAiFormat>,
}

impl OpenAiClient {
    /// Creates a client from configuration.
    ///
    /// If `config.client` is `Some`, that client is reused for connection
    /// pooling. Otherwise a new client is built with the configured timeout.
    pub fn new(config: OpenAiConfig) -> Self {
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

    /// Build the default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", self.config.api_key);
        headers.insert(
            "authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|_| LlmError::Auth("API key contains invalid header characters".into()))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        if let Some(org) = &self.config.organization {
            headers.insert(
                "openai-organization",
                HeaderValue::from_str(org).map_err(|_| {
                    LlmError::InvalidRequest(
                        "organization id contains invalid header characters".into(),
                    )
                })?,
            );
        }

        Ok(headers)
    }

    /// Build the full URL for the chat completions endpoint.
    fn completions_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// One request/response exchange, without retry.
    async fn exchange(&self, request: &Request<'_>) -> Result<RoundReply, LlmError> {
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
            return Err(convert::convert_error(http_status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::ResponseFormat {
                message: format!("failed to read OpenAI response body: {e}"),
                raw: String::new(),
            })?;

        let api_response: crate::types::Response =
            serde_json::from_str(&body).map_err(|e| LlmError::ResponseFormat {
                message: format!("failed to parse OpenAI response: {e}"),
                raw: body,
            })?;

        convert::parse_reply(api_response)
    }
}

impl ChatRound for OpenAiClient {
    type Turn = WireMessage;

    async fn round(
        &self,
        turns: &[WireMessage],
        tools: &[ToolSchema],
        options: &GenerateOptions,
    ) -> Result<RoundReply, LlmError> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        if let Some(system) = &options.system_message {
            debug!("prepending system message");
            messages.push(OpenAiFormat::system_message(system));
        }
        messages.extend_from_slice(turns);

        let request = convert::build_request(&self.config, messages, tools, options);

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

impl Llm for OpenAiClient {
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
            provider: "openai",
            model: self.config.model.clone(),
            tools: true,
            streaming: false,
        }
    }
}
