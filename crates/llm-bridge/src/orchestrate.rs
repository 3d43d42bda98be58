//! The tool-call loop.
//!
//! Vendors implement one round-trip ([`ChatRound`]); [`run_tool_loop`]
//! supplies everything around it — building the initial turn list, offering
//! the tool definitions, executing requested tools, feeding results back,
//! and enforcing the iteration budget. The loop's behavior is therefore
//! identical across vendors by construction.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::chat::ToolCall;
use crate::error::LlmError;
use crate::history::{HistoryBuilder, TurnFormat};
use crate::options::GenerateOptions;
use crate::schema::{ToolSchema, tool_schemas};
use crate::tool::Tool;

/// What the model produced in one round: reply text and any tool calls.
///
/// The round is final exactly when `tool_calls` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReply {
    /// Reply text; may be empty when the model only requested tools.
    pub text: String,
    /// Tool invocations requested by the model, in request order.
    pub tool_calls: Vec<ToolCall>,
}

/// One model round-trip: native turns and tool definitions in, reply out.
///
/// Implementations own everything vendor-specific about the round — request
/// construction, option reconciliation, transport, retries, response
/// parsing. They never execute tools or mutate the turn list.
pub trait ChatRound: Send + Sync {
    /// The vendor's native turn type, shared with its [`TurnFormat`].
    type Turn: Send + Sync;

    /// Performs one generation round against the vendor.
    fn round(
        &self,
        turns: &[Self::Turn],
        tools: &[ToolSchema],
        options: &GenerateOptions,
    ) -> impl Future<Output = Result<RoundReply, LlmError>> + Send;
}

/// Drives the tool-call loop to a final answer.
///
/// Each round sends the accumulated turns plus the (fixed) tool definitions.
/// A reply without tool calls ends the loop; otherwise every requested call
/// is executed sequentially in request order and its result appended before
/// the next round. Tool failures — including unknown tool names — never
/// abort the loop: they become `"Error: …"` result turns the model can react
/// to. Only the round budget ([`GenerateOptions::max_iterations`]) turns
/// into an error.
pub async fn run_tool_loop<F, R>(
    builder: &HistoryBuilder<F>,
    vendor: &R,
    prompt: &str,
    tools: &[Arc<dyn Tool>],
    options: &GenerateOptions,
) -> Result<String, LlmError>
where
    F: TurnFormat,
    F::Turn: Sync,
    R: ChatRound<Turn = F::Turn>,
{
    let schemas = tool_schemas(tools);
    let mut turns = builder.build(prompt, options.memory.as_deref()).await;
    let limit = options.max_iterations();

    for iteration in 0..limit {
        let reply = vendor.round(&turns, &schemas, options).await?;

        if reply.tool_calls.is_empty() {
            debug!(iteration, "model produced a final answer");
            return Ok(reply.text.trim().to_string());
        }

        debug!(
            iteration,
            calls = reply.tool_calls.len(),
            "model requested tool calls"
        );

        if let Some(turn) = builder
            .format()
            .assistant_turn(&reply.text, &reply.tool_calls)
        {
            turns.push(turn);
        }

        for call in &reply.tool_calls {
            let content = execute_call(tools, call).await;
            turns.push(
                builder
                    .format()
                    .tool_result_turn(&call.id, &call.name, &content),
            );
        }
    }

    Err(LlmError::IterationBudget { limit })
}

/// Runs a single requested call, rendering failures as result text.
async fn execute_call(tools: &[Arc<dyn Tool>], call: &ToolCall) -> String {
    let Some(tool) = tools.iter().find(|t| t.name() == call.name) else {
        warn!(tool = %call.name, "model requested an unknown tool");
        return format!("Error: tool not found: {}", call.name);
    };
    match tool.execute(&call.arguments).await {
        Ok(result) => result,
        Err(err) => {
            warn!(tool = %call.name, error = %err, "tool execution failed");
            format!("Error: {err}")
        }
    }
}
