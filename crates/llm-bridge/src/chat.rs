//! Conversation messages and tool calls.
//!
//! [`Message`] is the vendor-neutral unit of conversation history. Vendor
//! adapters never see these types on the wire — each adapter's
//! [`TurnFormat`](crate::history::TurnFormat) converts them into its native
//! shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instruction content, either top-level or mid-conversation.
    System,
    /// End-user input.
    User,
    /// Model output, possibly carrying tool calls.
    Assistant,
    /// The result of a tool invocation, correlated by `tool_call_id`.
    Tool,
}

/// A request, made by the model, to invoke a named tool.
///
/// `arguments` is the serialized JSON payload exactly as the vendor returned
/// it. It stays opaque at this layer; vendors whose wire format wants a
/// structured object (Gemini) parse it at conversion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque identifier, unique within one generation round. Pairs the call
    /// with its result turn.
    pub id: String,
    /// Tool identifier; matched against [`Tool::name`](crate::Tool::name).
    pub name: String,
    /// Serialized JSON arguments.
    pub arguments: String,
}

/// One turn in a conversation.
///
/// Values are immutable once produced; the tool loop appends new messages to
/// its request-scoped list rather than mutating existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced this turn.
    pub role: MessageRole,
    /// Text content. May be empty for assistant turns that only carry tool
    /// calls.
    pub content: String,
    /// Tool calls issued by an assistant turn; empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Set only on tool-role messages; correlates the result to the
    /// assistant [`ToolCall`] that requested it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Auxiliary fields not otherwise representable, e.g. the resolved
    /// `"tool_name"` for a tool result.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl Message {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            metadata: HashMap::new(),
        }
    }

    /// Creates an assistant message without tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            metadata: HashMap::new(),
        }
    }

    /// Creates an assistant message that carries tool calls.
    pub fn assistant_with_calls(content: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls: calls,
            tool_call_id: None,
            metadata: HashMap::new(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            metadata: HashMap::new(),
        }
    }

    /// Creates a tool-result message correlated to `call_id`, recording the
    /// tool's name under `metadata["tool_name"]` for vendors whose wire
    /// format keys results by name rather than id.
    pub fn tool_result(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("tool_name".to_string(), Value::String(tool_name.into()));
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
            metadata,
        }
    }

    /// The resolved tool name for a tool-result message, defaulting to
    /// `"unknown"` when the metadata entry is absent or not a string.
    pub fn tool_name(&self) -> &str {
        self.metadata
            .get("tool_name")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }
}
