//! OpenAI Chat Completions API request and response types.
//!
//! These types mirror OpenAI's wire format and are not part of the public
//! API. Conversion to/from `llm-bridge` types happens in
//! [`convert`](crate::convert).

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Request types ──────────────────────────────────────────────────

/// Top-level request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub model: &'a str,
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
    pub parallel_tool_calls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormatDef<'a>>,
}

/// A single conversation turn on the wire. Also the native turn type the
/// history builder produces for this vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireMessage {
    /// `"system"`, `"user"`, `"assistant"`, or `"tool"`.
    pub role: &'static str,
    /// Text content; `None` for assistant turns carrying only tool calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Calls issued by an assistant turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallOut>>,
    /// Correlating call id on tool-result turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// Tool call in an outgoing assistant message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallOut {
    /// The vendor-assigned call id.
    pub id: String,
    /// Always `"function"`.
    #[serde(rename = "type")]
    pub call_type: &'static str,
    /// The requested function and its arguments.
    pub function: FunctionCallOut,
}

/// Function call details in an outgoing assistant message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCallOut {
    /// Tool name.
    pub name: String,
    /// JSON string of the arguments.
    pub arguments: String,
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

/// Structured-output request wrapper.
#[derive(Debug, Serialize)]
pub(crate) struct ResponseFormatDef<'a> {
    #[serde(rename = "type")]
    pub format_type: &'static str,
    pub json_schema: JsonSchemaDef<'a>,
}

/// Named JSON schema for structured output.
#[derive(Debug, Serialize)]
pub(crate) struct JsonSchemaDef<'a> {
    pub name: &'a str,
    pub schema: &'a Value,
}

// ── Response types ─────────────────────────────────────────────────

/// Top-level chat completion response.
#[derive(Debug, Deserialize)]
pub(crate) struct Response {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One completion choice.
#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

/// The assistant message in a choice.
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallIn>,
}

/// Tool call in an incoming assistant message.
#[derive(Debug, Deserialize)]
pub(crate) struct ToolCallIn {
    pub id: String,
    pub function: FunctionCallIn,
}

/// Function call details in an incoming assistant message.
#[derive(Debug, Deserialize)]
pub(crate) struct FunctionCallIn {
    pub name: String,
    pub arguments: String,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetail,
}

/// The error body inside the envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_skips_unset_fields() {
        let req = Request {
            model: "gpt-4o-mini",
            messages: vec![WireMessage {
                role: "user",
                content: Some("hi".into()),
                tool_calls: None,
                tool_call_id: None,
            }],
            temperature: Some(0.7),
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            stop: None,
            tools: None,
            parallel_tool_calls: None,
            reasoning_effort: None,
            response_format: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("top_p").is_none());
        assert!(json.get("stop").is_none());
        assert!(json.get("tools").is_none());
        assert!(json.get("reasoning_effort").is_none());
        assert_eq!(json["temperature"], 0.7);
    }

    #[test]
    fn test_response_parses_tool_calls() {
        let body = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "get_weather", "arguments": "{\"location\":\"NYC\"}"}
                    }]
                }
            }]
        }"#;
        let resp: Response = serde_json::from_str(body).unwrap();
        assert_eq!(resp.choices.len(), 1);
        let message = &resp.choices[0].message;
        assert!(message.content.is_none());
        assert_eq!(message.tool_calls[0].function.name, "get_weather");
    }

    #[test]
    fn test_response_without_tool_calls() {
        let body = r#"{"choices":[{"message":{"content":"four"}}]}"#;
        let resp: Response = serde_json::from_str(body).unwrap();
        assert!(resp.choices[0].message.tool_calls.is_empty());
    }
}
