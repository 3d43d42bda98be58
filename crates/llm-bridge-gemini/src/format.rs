//! Native turn rendering for the Gemini wire format.

use llm_bridge::{ToolCall, TurnFormat};
use serde_json::{Map, json};
use tracing::warn;

use crate::types::{Content, FunctionCall, FunctionResponse, Part};

/// [`TurnFormat`] producing Gemini `contents`.
///
/// Differences from the chat-completion vendors:
/// - assistant turns use role `"model"` and carry calls as `functionCall`
///   parts with parsed argument objects (a parse failure degrades to an
///   empty object, logged at warn),
/// - tool results become user turns with a `functionResponse` part keyed by
///   function name; the call id has no wire representation,
/// - mid-history system turns fold into `"System: "`-prefixed user turns.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiFormat;

/// Parses a serialized argument string into the object Gemini expects.
fn parse_args(arguments: &str) -> Map<String, serde_json::Value> {
    match serde_json::from_str(arguments) {
        Ok(args) => args,
        Err(err) => {
            warn!(error = %err, arguments, "failed to parse tool call arguments");
            Map::new()
        }
    }
}

impl TurnFormat for GeminiFormat {
    type Turn = Content;

    fn user_turn(&self, text: &str) -> Content {
        Content {
            role: "user",
            parts: vec![Part::text(text)],
        }
    }

    fn assistant_turn(&self, text: &str, calls: &[ToolCall]) -> Option<Content> {
        let mut parts = Vec::new();
        if !text.is_empty() {
            parts.push(Part::text(text));
        }
        for call in calls {
            parts.push(Part {
                function_call: Some(FunctionCall {
                    name: call.name.clone(),
                    args: parse_args(&call.arguments),
                }),
                ..Default::default()
            });
        }
        if parts.is_empty() {
            return None;
        }
        Some(Content {
            role: "model",
            parts,
        })
    }

    fn tool_result_turn(&self, _call_id: &str, tool_name: &str, content: &str) -> Content {
        Content {
            role: "user",
            parts: vec![Part {
                function_response: Some(FunctionResponse {
                    name: tool_name.to_string(),
                    response: json!({ "result": content }),
                }),
                ..Default::default()
            }],
        }
    }

    fn system_turn(&self, text: &str) -> Content {
        Content {
            role: "user",
            parts: vec![Part::text(format!("System: {text}"))],
        }
    }
}
