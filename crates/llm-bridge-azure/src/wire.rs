//! Azure wire types: request body, response parsing, error mapping.
//!
//! The turn and tool-call shapes are OpenAI's, reused from
//! `llm-bridge-openai`. The request body differs only in omitting `model`
//! (the deployment is addressed in the URL).

use llm_bridge::{GenerateOptions, LlmError, RoundReply, ToolCall, ToolSchema};
use llm_bridge_openai::WireMessage;
use llm_bridge_openai::reasoning::{effective_temperature, is_reasoning_model};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AzureConfig;

/// Request body for the deployment's `chat/completions` endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDef<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

/// Tool definition sent in the request.
#[derive(Debug, Serialize)]
pub(crate) struct ToolDef<'a> {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: FunctionDef<'a>,
}

/// Function tool definition.
#[derive(Debug, Serialize)]
pub(crate) struct FunctionDef<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub parameters: &'a Value,
}

/// Builds the request body for one round against `config.deployment`.
pub(crate) fn build_request<'a>(
    config: &'a AzureConfig,
    messages: Vec<WireMessage>,
    tools: &'a [ToolSchema],
    options: &'a GenerateOptions,
) -> Request<'a> {
    let reasoning = is_reasoning_model(&config.deployment);
    let llm = &options.config;

    Request {
        messages,
        temperature: Some(effective_temperature(&config.deployment, llm.temperature)),
        top_p: if reasoning { None } else { Some(llm.top_p) },
        frequency_penalty: Some(llm.frequency_penalty),
        presence_penalty: Some(llm.presence_penalty),
        stop: if llm.stop_sequences.is_empty() {
            None
        } else {
            Some(&llm.stop_sequences)
        },
        tools: if tools.is_empty() {
            None
        } else {
            Some(
                tools
                    .iter()
                    .map(|schema| ToolDef {
                        tool_type: "function",
                        function: FunctionDef {
                            name: &schema.name,
                            description: &schema.description,
                            parameters: &schema.parameters,
                        },
                    })
                    .collect(),
            )
        },
        reasoning_effort: if reasoning {
            llm.reasoning.map(|effort| effort.as_str())
        } else {
            None
        },
        response_format: options.response_format.as_ref().map(|rf| {
            serde_json::json!({
                "type": "json_schema",
                "json_schema": { "name": rf.name, "schema": rf.schema },
            })
        }),
    }
}

// ── Response types ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct Response {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallIn>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToolCallIn {
    pub id: String,
    pub function: FunctionCallIn,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FunctionCallIn {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extracts the first choice as a [`RoundReply`].
pub(crate) fn parse_reply(response: Response) -> Result<RoundReply, LlmError> {
    let choice = response.choices.into_iter().next().ok_or(LlmError::NoResponse)?;
    Ok(RoundReply {
        text: choice.message.content.unwrap_or_default(),
        tool_calls: choice
            .message
            .tool_calls
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect(),
    })
}

/// Maps a non-2xx response to the unified error type.
pub(crate) fn convert_error(status: http::StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map_or_else(|_| body.to_string(), |e| e.error.message);

    if status == http::StatusCode::UNAUTHORIZED || status == http::StatusCode::FORBIDDEN {
        return LlmError::Auth(message);
    }

    if status == http::StatusCode::BAD_REQUEST {
        return LlmError::InvalidRequest(message);
    }

    LlmError::Http {
        status: Some(status),
        message,
        retryable: matches!(status.as_u16(), 429 | 500 | 502 | 503),
    }
}

#[cfg(test)]
mod tests {
    use llm_bridge::mock::MockMemory;
    use llm_bridge::{HistoryBuilder, LlmConfig, Message, TurnFormat};
    use llm_bridge_openai::OpenAiFormat;

    use super::*;

    fn azure(deployment: &str) -> AzureConfig {
        AzureConfig {
            deployment: deployment.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_has_no_model_field() {
        let config = azure("gpt-4o-mini");
        let options = GenerateOptions::default();
        let req = build_request(
            &config,
            vec![OpenAiFormat.user_turn("hi")],
            &[],
            &options,
        );
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("model").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_reasoning_deployment_rules_apply() {
        let options = GenerateOptions {
            config: LlmConfig {
                temperature: 0.3,
                ..Default::default()
            },
            ..Default::default()
        };
        let config = azure("o3-mini");
        let req = build_request(
            &config,
            vec![OpenAiFormat.user_turn("hi")],
            &[],
            &options,
        );
        assert_eq!(req.temperature, Some(1.0));
        assert!(req.top_p.is_none());
    }

    #[tokio::test]
    async fn test_request_from_replayed_memory_keeps_call_turns() {
        let memory = MockMemory::with_messages(vec![
            Message::user("look it up"),
            Message::assistant_with_calls(
                "",
                vec![ToolCall {
                    id: "call_1".into(),
                    name: "lookup".into(),
                    arguments: "{}".into(),
                }],
            ),
            Message::tool_result("call_1", "lookup", "42"),
        ]);
        let turns = HistoryBuilder::new(OpenAiFormat)
            .build("look it up", Some(&memory))
            .await;
        let config = azure("gpt-4o");
        let options = GenerateOptions::default();
        let req = build_request(&config, turns, &[], &options);
        let json = serde_json::to_value(&req).unwrap();

        assert!(json.get("model").is_none());
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1]["tool_calls"][0]["id"], "call_1");
        assert_eq!(messages[2]["role"], "tool");
        assert_eq!(messages[2]["tool_call_id"], "call_1");
    }

    #[test]
    fn test_parse_reply_zero_choices() {
        let response: Response = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(parse_reply(response), Err(LlmError::NoResponse)));
    }

    #[test]
    fn test_convert_error_auth() {
        let err = convert_error(
            http::StatusCode::FORBIDDEN,
            r#"{"error":{"message":"key disabled"}}"#,
        );
        assert!(matches!(err, LlmError::Auth(ref msg) if msg == "key disabled"));
    }

    #[test]
    fn test_convert_error_retryable() {
        let err = convert_error(http::StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(err.is_retryable());
    }
}
