//! Request assembly, response parsing, and error mapping.

use llm_bridge::{GenerateOptions, LlmError, RoundReply, ToolCall, ToolSchema};

use crate::types::{
    Content, ErrorResponse, FunctionDecl, GenerationConfig, Part, Request, Response,
    SystemInstruction, ToolsDecl,
};

/// Builds the request body for one round. The system message travels in the
/// dedicated `systemInstruction` field, never as a turn.
pub(crate) fn build_request<'a>(
    contents: Vec<Content>,
    tools: &'a [ToolSchema],
    options: &'a GenerateOptions,
) -> Request<'a> {
    let llm = &options.config;

    Request {
        contents,
        system_instruction: options.system_message.as_ref().map(|text| SystemInstruction {
            parts: vec![Part::text(text.clone())],
        }),
        tools: if tools.is_empty() {
            None
        } else {
            Some(vec![ToolsDecl {
                function_declarations: tools
                    .iter()
                    .map(|schema| FunctionDecl {
                        name: &schema.name,
                        description: &schema.description,
                        parameters: &schema.parameters,
                    })
                    .collect(),
            }])
        },
        generation_config: Some(GenerationConfig {
            temperature: llm.temperature,
            top_p: llm.top_p,
            stop_sequences: if llm.stop_sequences.is_empty() {
                None
            } else {
                Some(&llm.stop_sequences)
            },
            response_mime_type: options
                .response_format
                .as_ref()
                .map(|_| "application/json"),
            response_schema: options.response_format.as_ref().map(|rf| &rf.schema),
        }),
    }
}

/// Extracts the first candidate as a [`RoundReply`].
///
/// Text parts concatenate into the reply text; `functionCall` parts become
/// tool calls with synthesized sequential ids (`call-0`, `call-1`, …) since
/// the wire carries none.
pub(crate) fn parse_reply(response: Response) -> Result<RoundReply, LlmError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(LlmError::NoResponse)?;
    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    let mut text = String::new();
    let mut tool_calls = Vec::new();
    for part in parts {
        if let Some(t) = part.text {
            text.push_str(&t);
        }
        if let Some(call) = part.function_call {
            tool_calls.push(ToolCall {
                id: format!("call-{}", tool_calls.len()),
                name: call.name,
                arguments: serde_json::to_string(&call.args)?,
            });
        }
    }

    Ok(RoundReply { text, tool_calls })
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
    use llm_bridge::{LlmConfig, ResponseFormat, TurnFormat};
    use serde_json::json;

    use super::*;
    use crate::format::GeminiFormat;

    #[test]
    fn test_system_message_becomes_system_instruction() {
        let options = GenerateOptions {
            system_message: Some("Be terse.".into()),
            ..Default::default()
        };
        let req = build_request(vec![GeminiFormat.user_turn("hi")], &[], &options);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be terse.");
        // Not duplicated as a turn.
        assert_eq!(json["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_sampling_passes_through() {
        let options = GenerateOptions {
            config: LlmConfig {
                temperature: 0.3,
                top_p: 0.8,
                ..Default::default()
            },
            ..Default::default()
        };
        let req = build_request(vec![GeminiFormat.user_turn("hi")], &[], &options);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["generationConfig"]["temperature"], 0.3);
        assert_eq!(json["generationConfig"]["topP"], 0.8);
        assert!(json["generationConfig"].get("stopSequences").is_none());
    }

    #[test]
    fn test_structured_output_wire_shape() {
        let options = GenerateOptions {
            response_format: Some(ResponseFormat {
                name: "report".into(),
                schema: json!({"type":"object"}),
            }),
            ..Default::default()
        };
        let req = build_request(vec![GeminiFormat.user_turn("hi")], &[], &options);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "object");
    }

    #[test]
    fn test_tool_declarations() {
        let schemas = vec![ToolSchema {
            name: "get_weather".into(),
            description: "Current weather".into(),
            parameters: json!({"type":"object","properties":{},"required":[]}),
        }];
        let options = GenerateOptions::default();
        let req = build_request(
            vec![GeminiFormat.user_turn("hi")],
            &schemas,
            &options,
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json["tools"][0]["functionDeclarations"][0]["name"],
            "get_weather"
        );
    }

    #[test]
    fn test_parse_reply_text_and_calls() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "checking "},
                    {"functionCall": {"name": "get_weather", "args": {"location": "NYC"}}},
                    {"text": "now"}
                ]}
            }]
        }"#;
        let response: Response = serde_json::from_str(body).unwrap();
        let reply = parse_reply(response).unwrap();
        assert_eq!(reply.text, "checking now");
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].id, "call-0");
        assert_eq!(reply.tool_calls[0].name, "get_weather");
        let args: serde_json::Value =
            serde_json::from_str(&reply.tool_calls[0].arguments).unwrap();
        assert_eq!(args["location"], "NYC");
    }

    #[test]
    fn test_parse_reply_sequential_ids() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "a", "args": {}}},
                    {"functionCall": {"name": "b", "args": {}}}
                ]}
            }]
        }"#;
        let response: Response = serde_json::from_str(body).unwrap();
        let reply = parse_reply(response).unwrap();
        assert_eq!(reply.tool_calls[0].id, "call-0");
        assert_eq!(reply.tool_calls[1].id, "call-1");
    }

    #[test]
    fn test_parse_reply_zero_candidates() {
        let response: Response = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(parse_reply(response), Err(LlmError::NoResponse)));
    }

    #[test]
    fn test_convert_error_auth() {
        let err = convert_error(
            http::StatusCode::FORBIDDEN,
            r#"{"error":{"message":"API key not valid","status":"PERMISSION_DENIED"}}"#,
        );
        assert!(matches!(err, LlmError::Auth(ref msg) if msg == "API key not valid"));
    }

    #[test]
    fn test_convert_error_retryable() {
        let err = convert_error(http::StatusCode::SERVICE_UNAVAILABLE, "overloaded");
        assert!(err.is_retryable());
    }
}
