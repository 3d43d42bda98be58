//! Vendor-neutral history → native turn list conversion.
//!
//! Every vendor consumes the same logical conversation — current prompt,
//! optional replayed memory, tool-call pairs — but in its own wire shape.
//! [`HistoryBuilder`] owns the ordering and drop rules once; each vendor
//! supplies a small [`TurnFormat`] that only knows how to render a single
//! turn.
//!
//! Drop rules, applied during replay:
//!
//! - assistant turns with no content and no tool calls are dropped,
//! - tool-result turns without a correlating call id are dropped,
//! - a failing memory read is logged and degrades to an empty history.

use tracing::error;

use crate::chat::{Message, MessageRole, ToolCall};
use crate::memory::Memory;

/// Renders single conversation turns into a vendor's native shape.
///
/// Implementations are stateless value-to-value mappers; all sequencing
/// lives in [`HistoryBuilder`].
pub trait TurnFormat: Send + Sync {
    /// The vendor's native turn type.
    type Turn: Send;

    /// Renders a user turn.
    fn user_turn(&self, text: &str) -> Self::Turn;

    /// Renders an assistant turn. Returning `None` drops the turn; the
    /// builder asks only when the turn has content or tool calls, but a
    /// format may still reject shapes it cannot represent.
    fn assistant_turn(&self, text: &str, calls: &[ToolCall]) -> Option<Self::Turn>;

    /// Renders a tool-result turn correlated to `call_id`.
    fn tool_result_turn(&self, call_id: &str, tool_name: &str, content: &str) -> Self::Turn;

    /// Renders a mid-conversation system turn.
    fn system_turn(&self, text: &str) -> Self::Turn;
}

/// Builds a vendor-native turn list from a prompt and optional memory.
///
/// Stateless and reusable across requests.
#[derive(Debug, Clone, Default)]
pub struct HistoryBuilder<F: TurnFormat> {
    format: F,
}

impl<F: TurnFormat> HistoryBuilder<F> {
    /// Creates a builder around a vendor's turn format.
    pub fn new(format: F) -> Self {
        Self { format }
    }

    /// The underlying turn format, for callers that render turns outside a
    /// full build (the tool loop appends rounds incrementally).
    pub fn format(&self) -> &F {
        &self.format
    }

    /// Builds the native turn list.
    ///
    /// Without memory the list is exactly the prompt as one user turn. With
    /// memory the list is the replayed history alone — callers append the
    /// current prompt to memory before the call, so the builder never adds
    /// it a second time. A memory read failure never fails the call: the
    /// error is logged and the history degrades to empty.
    pub async fn build(&self, prompt: &str, memory: Option<&dyn Memory>) -> Vec<F::Turn> {
        let Some(memory) = memory else {
            return vec![self.format.user_turn(prompt)];
        };

        let mut turns = Vec::new();
        match memory.get_messages().await {
            Ok(messages) => {
                for message in &messages {
                    if let Some(turn) = self.convert(message) {
                        turns.push(turn);
                    }
                }
            }
            Err(err) => {
                error!(error = %err, "failed to read conversation memory");
            }
        }
        turns
    }

    /// Converts one stored message, applying the drop rules.
    pub fn convert(&self, message: &Message) -> Option<F::Turn> {
        match message.role {
            MessageRole::User => Some(self.format.user_turn(&message.content)),
            MessageRole::System => Some(self.format.system_turn(&message.content)),
            MessageRole::Assistant => {
                if message.content.is_empty() && message.tool_calls.is_empty() {
                    return None;
                }
                self.format
                    .assistant_turn(&message.content, &message.tool_calls)
            }
            MessageRole::Tool => {
                let call_id = message.tool_call_id.as_deref().filter(|id| !id.is_empty())?;
                Some(
                    self.format
                        .tool_result_turn(call_id, message.tool_name(), &message.content),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockMemory, TestFormat, TestTurn};

    fn builder() -> HistoryBuilder<TestFormat> {
        HistoryBuilder::new(TestFormat)
    }

    #[tokio::test]
    async fn test_no_memory_yields_single_user_turn() {
        let turns = builder().build("What is 2+2?", None).await;
        assert_eq!(turns, vec![TestTurn::user("What is 2+2?")]);
    }

    #[tokio::test]
    async fn test_memory_replayed_in_order_without_extra_prompt() {
        let memory = MockMemory::with_messages(vec![
            Message::user("first"),
            Message::assistant("second"),
            Message::user("third"),
        ]);
        // The caller appended "third" to memory already; the builder must
        // not append the prompt again.
        let turns = builder().build("third", Some(&memory)).await;
        assert_eq!(
            turns,
            vec![
                TestTurn::user("first"),
                TestTurn::assistant("second", 0),
                TestTurn::user("third"),
            ]
        );
    }

    #[tokio::test]
    async fn test_memory_failure_degrades_to_empty() {
        let memory = MockMemory::failing("store offline");
        let turns = builder().build("ignored", Some(&memory)).await;
        assert!(turns.is_empty());
    }

    #[tokio::test]
    async fn test_empty_assistant_turn_dropped() {
        let memory = MockMemory::with_messages(vec![
            Message::user("hi"),
            Message::assistant(""),
            Message::assistant("real reply"),
        ]);
        let turns = builder().build("hi", Some(&memory)).await;
        assert_eq!(
            turns,
            vec![TestTurn::user("hi"), TestTurn::assistant("real reply", 0)]
        );
    }

    #[tokio::test]
    async fn test_assistant_turn_with_only_calls_kept() {
        let memory = MockMemory::with_messages(vec![Message::assistant_with_calls(
            "",
            vec![ToolCall {
                id: "call_1".into(),
                name: "search".into(),
                arguments: "{}".into(),
            }],
        )]);
        let turns = builder().build("next", Some(&memory)).await;
        assert_eq!(turns, vec![TestTurn::assistant("", 1)]);
    }

    #[tokio::test]
    async fn test_tool_result_without_call_id_dropped() {
        let mut orphan = Message::tool_result("", "get_weather", "Sunny");
        orphan.tool_call_id = None;
        let memory = MockMemory::with_messages(vec![
            orphan,
            Message::tool_result("call_9", "get_weather", "Sunny"),
        ]);
        let turns = builder().build("next", Some(&memory)).await;
        assert_eq!(turns, vec![TestTurn::tool("call_9", "get_weather", "Sunny")]);
    }

    #[tokio::test]
    async fn test_tool_result_with_empty_call_id_dropped() {
        let memory = MockMemory::with_messages(vec![Message::tool_result("", "lookup", "x")]);
        let turns = builder().build("next", Some(&memory)).await;
        assert!(turns.is_empty());
    }

    #[test]
    fn test_tool_result_name_defaults_to_unknown() {
        let mut message = Message::tool_result("call_1", "lookup", "42");
        message.metadata.clear();
        let turn = builder().convert(&message).unwrap();
        assert_eq!(turn, TestTurn::tool("call_1", "unknown", "42"));
    }

    #[tokio::test]
    async fn test_system_turn_replayed() {
        let memory = MockMemory::with_messages(vec![Message::system("Be brief.")]);
        let turns = builder().build("go", Some(&memory)).await;
        assert_eq!(turns, vec![TestTurn::system("Be brief.")]);
    }
}
