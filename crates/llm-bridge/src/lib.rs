//! # llm-bridge
//!
//! Provider-agnostic types and traits for interacting with large language
//! models. This crate defines the shared vocabulary every vendor adapter
//! speaks — messages, tool calls, generation options, errors — plus the two
//! pieces of machinery that are identical across vendors and therefore live
//! here exactly once:
//!
//! - the **history builder** ([`history::HistoryBuilder`]), which converts a
//!   role-tagged conversation history into a vendor's native turn list
//!   through a small per-vendor [`history::TurnFormat`] strategy, and
//! - the **tool loop** ([`orchestrate::run_tool_loop`]), which drives the
//!   "model requests a tool, tool runs, result is fed back" cycle to a final
//!   answer under an iteration budget.
//!
//! Concrete vendors live in sibling crates (`llm-bridge-openai`,
//! `llm-bridge-azure`, `llm-bridge-gemini`) and implement [`Llm`] (or its
//! object-safe counterpart [`DynLlm`]).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use llm_bridge::{GenerateOptions, Llm};
//!
//! # async fn example(client: impl Llm) -> Result<(), llm_bridge::LlmError> {
//! let answer = client
//!     .generate("Explain ownership in Rust", &GenerateOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chat`] | Messages and tool calls |
//! | [`error`] | Unified [`LlmError`] across all vendors |
//! | [`history`] | Generic history builder + per-vendor turn strategy |
//! | [`llm`] | The [`Llm`] trait, [`DynLlm`], and [`Capabilities`] |
//! | [`memory`] | Conversation store read interface |
//! | [`options`] | Per-request generation options |
//! | [`orchestrate`] | The tool-call loop and single-round vendor contract |
//! | [`retry`] | Retry policy and executor for one network round |
//! | [`schema`] | Tool parameter → JSON schema normalization |
//! | [`tool`] | The [`Tool`] trait and closure adapter |
//! | [`traced`] | Tracing middleware decorating any [`Llm`] |

#![warn(missing_docs)]

pub mod chat;
pub mod error;
pub mod history;
pub mod llm;
pub mod memory;
pub mod options;
pub mod orchestrate;
pub mod retry;
pub mod schema;
pub mod tool;
pub mod traced;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use chat::{Message, MessageRole, ToolCall};
pub use error::LlmError;
pub use history::{HistoryBuilder, TurnFormat};
pub use llm::{Capabilities, DynLlm, Llm};
pub use memory::Memory;
pub use options::{GenerateOptions, LlmConfig, ReasoningEffort, ResponseFormat};
pub use orchestrate::{ChatRound, RoundReply, run_tool_loop};
pub use retry::{RetryExecutor, RetryPolicy};
pub use schema::{ToolSchema, tool_schemas};
pub use tool::{ParameterSpec, Tool, ToolError};
pub use traced::{Span, TracedLlm, Tracer};
