//! Gemini `generateContent` API request and response types.
//!
//! These types mirror Gemini's wire format. [`Content`] and [`Part`] are
//! public because they double as the native turn type the history builder
//! produces for this vendor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Turns (shared by request and response) ─────────────────────────

/// One conversation turn: a role and a list of typed parts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    /// `"user"` or `"model"`.
    pub role: &'static str,
    /// The turn's parts, in order.
    pub parts: Vec<Part>,
}

/// A typed content part. Exactly one field is set per part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Plain text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// A model-issued function call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    /// A host-supplied function result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// A function call with structured arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The function's name.
    pub name: String,
    /// Parsed argument object.
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// A function result, keyed by function name (the wire has no call ids).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// The function's name.
    pub name: String,
    /// The result wrapped as `{"result": …}`.
    pub response: Value,
}

// ── Request types ──────────────────────────────────────────────────

/// Top-level request body for `POST …/models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Request<'a> {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolsDecl<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig<'a>>,
}

/// The dedicated system-instruction field.
#[derive(Debug, Serialize)]
pub(crate) struct SystemInstruction {
    pub parts: Vec<Part>,
}

/// Wrapper holding the function declarations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToolsDecl<'a> {
    pub function_declarations: Vec<FunctionDecl<'a>>,
}

/// One declared function.
#[derive(Debug, Serialize)]
pub(crate) struct FunctionDecl<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub parameters: &'a Value,
}

/// Sampling configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig<'a> {
    pub temperature: f64,
    pub top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<&'a Value>,
}

// ── Response types ─────────────────────────────────────────────────

/// Top-level response.
#[derive(Debug, Deserialize)]
pub(crate) struct Response {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate.
#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

/// The candidate's content. Role is ignored on parse.
#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
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
    use serde_json::json;

    use super::*;

    #[test]
    fn test_part_serializes_single_field() {
        let part = Part::text("hello");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json, json!({"text": "hello"}));
    }

    #[test]
    fn test_function_call_part_round_trip() {
        let body = r#"{"functionCall":{"name":"get_weather","args":{"location":"NYC"}}}"#;
        let part: Part = serde_json::from_str(body).unwrap();
        let call = part.function_call.unwrap();
        assert_eq!(call.name, "get_weather");
        assert_eq!(call.args["location"], "NYC");
    }

    #[test]
    fn test_response_parses_candidates() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "four"}]}
            }]
        }"#;
        let resp: Response = serde_json::from_str(body).unwrap();
        let content = resp.candidates[0].content.as_ref().unwrap();
        assert_eq!(content.parts[0].text.as_deref(), Some("four"));
    }
}
