//! Native turn rendering for the Chat Completions wire format.

use llm_bridge::{ToolCall, TurnFormat};

use crate::types::{FunctionCallOut, ToolCallOut, WireMessage};

/// [`TurnFormat`] producing Chat Completions messages.
///
/// Tool results are keyed by call id; assistant tool calls carry their
/// arguments as the original JSON string, untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiFormat;

impl OpenAiFormat {
    /// The top-level instruction as a leading system turn.
    pub fn system_message(text: &str) -> WireMessage {
        WireMessage {
            role: "system",
            content: Some(text.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

impl TurnFormat for OpenAiFormat {
    type Turn = WireMessage;

    fn user_turn(&self, text: &str) -> WireMessage {
        WireMessage {
            role: "user",
            content: Some(text.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn assistant_turn(&self, text: &str, calls: &[ToolCall]) -> Option<WireMessage> {
        let tool_calls: Vec<ToolCallOut> = calls
            .iter()
            .map(|call| ToolCallOut {
                id: call.id.clone(),
                call_type: "function",
                function: FunctionCallOut {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                },
            })
            .collect();
        Some(WireMessage {
            role: "assistant",
            content: if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            },
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
        })
    }

    fn tool_result_turn(&self, call_id: &str, _tool_name: &str, content: &str) -> WireMessage {
        WireMessage {
            role: "tool",
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: Some(call_id.to_string()),
        }
    }

    fn system_turn(&self, text: &str) -> WireMessage {
        Self::system_message(text)
    }
}

#[cfg(test)]
mod tests {
    use llm_bridge::mock::MockMemory;
    use llm_bridge::{HistoryBuilder, Message};

    use super::*;

    #[test]
    fn test_user_turn() {
        let turn = OpenAiFormat.user_turn("hello");
        assert_eq!(turn.role, "user");
        assert_eq!(turn.content.as_deref(), Some("hello"));
    }

    #[test]
    fn test_assistant_turn_with_calls_drops_empty_content() {
        let turn = OpenAiFormat
            .assistant_turn(
                "",
                &[ToolCall {
                    id: "call_1".into(),
                    name: "search".into(),
                    arguments: r#"{"q":"rust"}"#.into(),
                }],
            )
            .unwrap();
        assert_eq!(turn.role, "assistant");
        assert!(turn.content.is_none());
        let calls = turn.tool_calls.unwrap();
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].function.arguments, r#"{"q":"rust"}"#);
    }

    #[test]
    fn test_tool_result_keyed_by_call_id() {
        let turn = OpenAiFormat.tool_result_turn("call_7", "get_weather", "Sunny");
        assert_eq!(turn.role, "tool");
        assert_eq!(turn.tool_call_id.as_deref(), Some("call_7"));
        assert_eq!(turn.content.as_deref(), Some("Sunny"));
    }

    #[test]
    fn test_serialized_turn_shape() {
        let turn = OpenAiFormat.tool_result_turn("call_7", "get_weather", "Sunny");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_7");
        assert!(json.get("tool_calls").is_none());
    }

    #[tokio::test]
    async fn test_memory_replay_keeps_call_result_pairing() {
        let memory = MockMemory::with_messages(vec![
            Message::user("weather in Paris?"),
            Message::assistant_with_calls(
                "",
                vec![ToolCall {
                    id: "call_1".into(),
                    name: "get_weather".into(),
                    arguments: r#"{"location":"Paris"}"#.into(),
                }],
            ),
            Message::tool_result("call_1", "get_weather", "Rainy"),
            Message::assistant("It is rainy in Paris."),
        ]);
        let builder = HistoryBuilder::new(OpenAiFormat);
        let turns = builder.build("weather in Paris?", Some(&memory)).await;

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[1].role, "assistant");
        assert_eq!(turns[1].tool_calls.as_ref().unwrap()[0].id, "call_1");
        assert_eq!(turns[2].role, "tool");
        assert_eq!(turns[2].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(turns[3].content.as_deref(), Some("It is rainy in Paris."));
    }

    #[tokio::test]
    async fn test_memory_failure_degrades_to_empty_history() {
        let memory = MockMemory::failing("store offline");
        let turns = HistoryBuilder::new(OpenAiFormat)
            .build("hi", Some(&memory))
            .await;
        assert!(turns.is_empty());
    }
}
