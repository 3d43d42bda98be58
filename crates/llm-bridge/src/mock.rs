//! Test doubles: scripted vendors, canned memory, a recording tracer.
//!
//! Available to downstream crates behind the `test-utils` feature so vendor
//! adapters and applications can test against the same doubles the core
//! uses.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use serde_json::Value;

use crate::chat::{Message, ToolCall};
use crate::error::LlmError;
use crate::history::TurnFormat;
use crate::memory::{Memory, MemoryError};
use crate::options::GenerateOptions;
use crate::orchestrate::{ChatRound, RoundReply};
use crate::schema::ToolSchema;
use crate::traced::{Span, Tracer};

// ── Memory ──

/// A memory store with canned contents, or a canned failure.
#[derive(Debug, Default)]
pub struct MockMemory {
    messages: Vec<Message>,
    failure: Option<String>,
}

impl MockMemory {
    /// A store that returns `messages`.
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            failure: None,
        }
    }

    /// A store whose reads fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            failure: Some(message.into()),
        }
    }
}

impl Memory for MockMemory {
    fn get_messages<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Message>, MemoryError>> + Send + 'a>> {
        let result = match &self.failure {
            Some(message) => Err(MemoryError::from(message.clone())),
            None => Ok(self.messages.clone()),
        };
        Box::pin(async move { result })
    }
}

// ── Turn format ──

/// An inspectable native turn for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestTurn {
    /// A user turn.
    User(String),
    /// An assistant turn carrying `calls` tool calls.
    Assistant {
        /// The reply text.
        text: String,
        /// How many tool calls the turn carried.
        calls: usize,
    },
    /// A tool-result turn.
    Tool {
        /// The correlating call id.
        call_id: String,
        /// The tool's name.
        tool_name: String,
        /// The result text.
        content: String,
    },
    /// A system turn.
    System(String),
}

impl TestTurn {
    /// A user turn.
    pub fn user(text: &str) -> Self {
        Self::User(text.into())
    }

    /// An assistant turn with `calls` tool calls.
    pub fn assistant(text: &str, calls: usize) -> Self {
        Self::Assistant {
            text: text.into(),
            calls,
        }
    }

    /// A tool-result turn.
    pub fn tool(call_id: &str, tool_name: &str, content: &str) -> Self {
        Self::Tool {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            content: content.into(),
        }
    }

    /// A system turn.
    pub fn system(text: &str) -> Self {
        Self::System(text.into())
    }
}

/// A [`TurnFormat`] that produces [`TestTurn`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestFormat;

impl TurnFormat for TestFormat {
    type Turn = TestTurn;

    fn user_turn(&self, text: &str) -> TestTurn {
        TestTurn::user(text)
    }

    fn assistant_turn(&self, text: &str, calls: &[ToolCall]) -> Option<TestTurn> {
        Some(TestTurn::assistant(text, calls.len()))
    }

    fn tool_result_turn(&self, call_id: &str, tool_name: &str, content: &str) -> TestTurn {
        TestTurn::tool(call_id, tool_name, content)
    }

    fn system_turn(&self, text: &str) -> TestTurn {
        TestTurn::system(text)
    }
}

// ── Vendor round ──

/// What one scripted round observed.
#[derive(Debug, Clone)]
pub struct RecordedRound {
    /// Snapshot of the turn list sent to the vendor.
    pub turns: Vec<TestTurn>,
    /// The tool definitions offered.
    pub tools: Vec<ToolSchema>,
}

/// A [`ChatRound`] that replays a script of replies and records what each
/// round received.
#[derive(Debug)]
pub struct ScriptedRound {
    script: Mutex<VecDeque<Result<RoundReply, LlmError>>>,
    recorded: Mutex<Vec<RecordedRound>>,
}

impl ScriptedRound {
    /// A vendor that replies from `script`, in order. Running past the end
    /// of the script fails with [`LlmError::NoResponse`].
    pub fn new(script: Vec<Result<RoundReply, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// How many rounds were performed.
    pub fn rounds(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    /// The turn list round `index` received.
    pub fn turns_of_round(&self, index: usize) -> Vec<TestTurn> {
        self.recorded.lock().unwrap()[index].turns.clone()
    }

    /// The tool definitions round `index` received.
    pub fn tools_of_round(&self, index: usize) -> Vec<ToolSchema> {
        self.recorded.lock().unwrap()[index].tools.clone()
    }
}

impl ChatRound for ScriptedRound {
    type Turn = TestTurn;

    async fn round(
        &self,
        turns: &[TestTurn],
        tools: &[ToolSchema],
        _options: &GenerateOptions,
    ) -> Result<RoundReply, LlmError> {
        self.recorded.lock().unwrap().push(RecordedRound {
            turns: turns.to_vec(),
            tools: tools.to_vec(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::NoResponse))
    }
}

// ── Tracer ──

/// A finished span as recorded by [`MockTracer`].
#[derive(Debug, Clone)]
pub struct RecordedSpan {
    /// The operation name the span was started with.
    pub name: String,
    /// Attributes in the order they were set.
    pub attributes: Vec<(String, Value)>,
    /// The rendered error, if one was recorded.
    pub error: Option<String>,
    /// Whether `end` was called.
    pub ended: bool,
}

/// A [`Tracer`] that collects finished spans for assertions.
#[derive(Debug, Default)]
pub struct MockTracer {
    finished: std::sync::Arc<Mutex<Vec<RecordedSpan>>>,
}

impl MockTracer {
    /// Spans that have ended so far.
    pub fn finished_spans(&self) -> Vec<RecordedSpan> {
        self.finished.lock().unwrap().clone()
    }
}

impl Tracer for MockTracer {
    fn start_span(&self, name: &str) -> Box<dyn Span> {
        Box::new(MockSpan {
            record: RecordedSpan {
                name: name.to_string(),
                attributes: Vec::new(),
                error: None,
                ended: false,
            },
            sink: self.finished.clone(),
        })
    }
}

struct MockSpan {
    record: RecordedSpan,
    sink: std::sync::Arc<Mutex<Vec<RecordedSpan>>>,
}

impl Span for MockSpan {
    fn set_attribute(&mut self, key: &str, value: Value) {
        self.record.attributes.push((key.to_string(), value));
    }

    fn record_error(&mut self, error: &LlmError) {
        self.record.error = Some(error.to_string());
    }

    fn end(&mut self) {
        self.record.ended = true;
        self.sink.lock().unwrap().push(self.record.clone());
    }
}
