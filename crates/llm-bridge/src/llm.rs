//! The [`Llm`] trait, its object-safe mirror, and capability descriptors.
//!
//! [`Llm`] uses async-fn-in-trait for ergonomic static dispatch. Code that
//! needs `dyn` (heterogeneous client collections, middleware chains built at
//! runtime) uses [`DynLlm`], which every `Llm` implements via a blanket
//! impl.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::LlmError;
use crate::options::GenerateOptions;
use crate::tool::Tool;

/// What a client can do, resolved once at construction from its static
/// configuration. Never probed at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Vendor identifier, e.g. `"openai"`.
    pub provider: &'static str,
    /// The configured model or deployment name.
    pub model: String,
    /// Whether the client supports tool calling.
    pub tools: bool,
    /// Whether the client supports streamed responses.
    pub streaming: bool,
}

/// A vendor-agnostic text-generation client.
pub trait Llm: Send + Sync {
    /// Generates a reply to `prompt`, replaying any configured memory.
    fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// Generates a reply, letting the model invoke the offered tools until
    /// it produces a final answer.
    fn generate_with_tools(
        &self,
        prompt: &str,
        tools: &[Arc<dyn Tool>],
        options: &GenerateOptions,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// The client's capability descriptor.
    fn capabilities(&self) -> Capabilities;
}

/// Object-safe mirror of [`Llm`].
///
/// Implemented for every `Llm` by a blanket impl; call sites that hold
/// `Arc<dyn DynLlm>` pay one box per call.
pub trait DynLlm: Send + Sync {
    /// See [`Llm::generate`].
    fn generate_dyn<'a>(
        &'a self,
        prompt: &'a str,
        options: &'a GenerateOptions,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;

    /// See [`Llm::generate_with_tools`].
    fn generate_with_tools_dyn<'a>(
        &'a self,
        prompt: &'a str,
        tools: &'a [Arc<dyn Tool>],
        options: &'a GenerateOptions,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;

    /// See [`Llm::capabilities`].
    fn capabilities_dyn(&self) -> Capabilities;
}

impl<T: Llm> DynLlm for T {
    fn generate_dyn<'a>(
        &'a self,
        prompt: &'a str,
        options: &'a GenerateOptions,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
        Box::pin(self.generate(prompt, options))
    }

    fn generate_with_tools_dyn<'a>(
        &'a self,
        prompt: &'a str,
        tools: &'a [Arc<dyn Tool>],
        options: &'a GenerateOptions,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
        Box::pin(self.generate_with_tools(prompt, tools, options))
    }

    fn capabilities_dyn(&self) -> Capabilities {
        self.capabilities()
    }
}
