//! The [`Tool`] trait and closure adapter.
//!
//! A tool is a named, described, schema-typed callable the model may invoke
//! mid-conversation. Implement [`Tool`] for tools that need state; for
//! simple tools, wrap an async closure with [`FnTool`].
//!
//! The trait is object-safe (boxed futures) so tools can be passed as
//! `&[Arc<dyn Tool>]` into the loop.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

/// Error raised by a tool invocation.
///
/// Tool failures never abort the loop — the orchestrator renders them as an
/// `"Error: …"` result turn so the model can react.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The tool rejected its arguments.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// The tool failed at runtime.
    #[error("{0}")]
    Execution(String),
}

/// Item type for array-typed parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterItems {
    /// JSON-schema type of each array element. Empty means unspecified; the
    /// schema normalizer substitutes `"string"`.
    pub item_type: String,
}

/// Declared shape of a single tool parameter.
///
/// This is deliberately looser than full JSON Schema — it covers what the
/// vendors' function-calling formats actually consume. Normalization into a
/// schema document happens in [`schema`](crate::schema).
#[derive(Debug, Clone, Default)]
pub struct ParameterSpec {
    /// JSON-schema type name (`"string"`, `"integer"`, `"array"`, …).
    pub param_type: String,
    /// Human-readable description shown to the model.
    pub description: String,
    /// Whether the parameter must be supplied.
    pub required: bool,
    /// Allowed values, passed through verbatim when present.
    pub enum_values: Option<Vec<Value>>,
    /// Element spec for array parameters.
    pub items: Option<ParameterItems>,
}

/// A callable capability offered to the model during generation.
pub trait Tool: Send + Sync {
    /// The tool's identifier, matched against
    /// [`ToolCall::name`](crate::ToolCall::name).
    fn name(&self) -> &str;

    /// Human-readable description shown to the model so it knows when to
    /// use this tool.
    fn description(&self) -> &str;

    /// Declared parameters, keyed by parameter name.
    fn parameters(&self) -> HashMap<String, ParameterSpec>;

    /// Executes the tool with the serialized JSON arguments the model
    /// produced. The returned string is fed back to the model verbatim.
    fn execute<'a>(
        &'a self,
        arguments: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>>;
}

/// A tool backed by an async closure, for tests and simple capabilities.
pub struct FnTool<F> {
    name: String,
    description: String,
    parameters: HashMap<String, ParameterSpec>,
    handler: F,
}

impl<F> std::fmt::Debug for FnTool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F, Fut> FnTool<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
{
    /// Wraps an async closure as a [`Tool`].
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: HashMap<String, ParameterSpec>,
        handler: F,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler,
        })
    }
}

impl<F, Fut> Tool for FnTool<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> HashMap<String, ParameterSpec> {
        self.parameters.clone()
    }

    fn execute<'a>(
        &'a self,
        arguments: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>> {
        let fut = (self.handler)(arguments.to_string());
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_tool_executes() {
        let tool = FnTool::new("echo", "Echo the input back", HashMap::new(), |args| async move {
            Ok(format!("echo: {args}"))
        });
        assert_eq!(tool.name(), "echo");
        let out = tool.execute(r#"{"x":1}"#).await.unwrap();
        assert_eq!(out, r#"echo: {"x":1}"#);
    }

    #[tokio::test]
    async fn test_fn_tool_error_display() {
        let tool = FnTool::new("boom", "Always fails", HashMap::new(), |_args| async {
            Err(ToolError::Execution("kaboom".into()))
        });
        let err = tool.execute("{}").await.unwrap_err();
        assert_eq!(format!("{err}"), "kaboom");
    }

    #[test]
    fn test_tool_is_object_safe() {
        fn assert_dyn(_t: &dyn Tool) {}
        let tool = FnTool::new("noop", "", HashMap::new(), |_| async { Ok(String::new()) });
        assert_dyn(tool.as_ref());
    }
}
