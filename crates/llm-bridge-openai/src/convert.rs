//! Request assembly, response parsing, and error mapping.

use llm_bridge::{GenerateOptions, LlmError, RoundReply, ToolCall, ToolSchema};

use crate::config::OpenAiConfig;
use crate::reasoning::{effective_temperature, is_reasoning_model};
use crate::types::{
    ErrorResponse, FunctionDef, JsonSchemaDef, Request, Response, ResponseFormatDef, ToolDef,
    WireMessage,
};

/// Builds the request body for one round, reconciling the caller's sampling
/// options against the configured model's constraints.
pub(crate) fn build_request<'a>(
    config: &'a OpenAiConfig,
    messages: Vec<WireMessage>,
    tools: &'a [ToolSchema],
    options: &'a GenerateOptions,
) -> Request<'a> {
    let reasoning = is_reasoning_model(&config.model);
    let llm = &options.config;

    let tool_defs = if tools.is_empty() {
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
    };

    Request {
        model: &config.model,
        messages,
        temperature: Some(effective_temperature(&config.model, llm.temperature)),
        top_p: if reasoning { None } else { Some(llm.top_p) },
        frequency_penalty: Some(llm.frequency_penalty),
        presence_penalty: Some(llm.presence_penalty),
        stop: if llm.stop_sequences.is_empty() {
            None
        } else {
            Some(&llm.stop_sequences)
        },
        parallel_tool_calls: if reasoning || tool_defs.is_none() {
            None
        } else {
            Some(true)
        },
        tools: tool_defs,
        reasoning_effort: if reasoning {
            llm.reasoning.map(|effort| effort.as_str())
        } else {
            None
        },
        response_format: options.response_format.as_ref().map(|rf| ResponseFormatDef {
            format_type: "json_schema",
            json_schema: JsonSchemaDef {
                name: &rf.name,
                schema: &rf.schema,
            },
        }),
    }
}

/// Extracts the first choice of a parsed response as a [`RoundReply`].
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

    let retryable = matches!(status.as_u16(), 429 | 500 | 502 | 503);

    LlmError::Http {
        status: Some(status),
        message,
        retryable,
    }
}
