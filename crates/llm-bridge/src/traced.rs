//! Tracing middleware decorating any [`Llm`].
//!
//! [`TracedLlm`] wraps a client and records one span per generation call:
//! prompt length and hash on entry, response length, hash, and duration on
//! exit, and the error on failure. Hashing (SHA-256, lowercase hex) keeps
//! prompt and response content out of trace backends while still letting
//! identical payloads be correlated.
//!
//! The [`Tracer`]/[`Span`] pair is deliberately minimal so any tracing
//! backend can be adapted without pulling its SDK into this crate.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use crate::error::LlmError;
use crate::llm::{Capabilities, Llm};
use crate::options::GenerateOptions;
use crate::tool::Tool;

/// An in-flight trace span.
pub trait Span: Send {
    /// Attaches a key/value attribute.
    fn set_attribute(&mut self, key: &str, value: Value);

    /// Records a failure on the span.
    fn record_error(&mut self, error: &LlmError);

    /// Closes the span.
    fn end(&mut self);
}

/// Creates spans for generation calls.
pub trait Tracer: Send + Sync {
    /// Starts a span with the given operation name.
    fn start_span(&self, name: &str) -> Box<dyn Span>;
}

/// SHA-256 of `text`, as lowercase hex. Empty input stays empty so trace
/// queries can distinguish "no content" from "content was empty".
fn content_hash(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let digest = Sha256::digest(text.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

/// A middleware that records a trace span around every call to the wrapped
/// client. Transparent otherwise: same results, same errors.
#[derive(Clone)]
pub struct TracedLlm<L> {
    inner: L,
    tracer: Arc<dyn Tracer>,
}

impl<L> std::fmt::Debug for TracedLlm<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracedLlm").finish_non_exhaustive()
    }
}

impl<L: Llm> TracedLlm<L> {
    /// Wraps `inner` so every call is recorded through `tracer`.
    pub fn new(inner: L, tracer: Arc<dyn Tracer>) -> Self {
        Self { inner, tracer }
    }

    /// The wrapped client.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    fn open_span(&self, name: &str, prompt: &str) -> Box<dyn Span> {
        let mut span = self.tracer.start_span(name);
        span.set_attribute("prompt.length", json!(prompt.len()));
        span.set_attribute("prompt.hash", json!(content_hash(prompt)));
        span.set_attribute("model", json!(self.inner.capabilities().model));
        span
    }

    fn close_span(
        span: &mut Box<dyn Span>,
        started: Instant,
        outcome: &Result<String, LlmError>,
    ) {
        match outcome {
            Ok(response) => {
                span.set_attribute("response.length", json!(response.len()));
                span.set_attribute("response.hash", json!(content_hash(response)));
            }
            Err(err) => span.record_error(err),
        }
        span.set_attribute("duration_ms", json!(started.elapsed().as_millis() as u64));
        span.end();
    }
}

impl<L: Llm> Llm for TracedLlm<L> {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let mut span = self.open_span("llm.generate", prompt);
        let started = Instant::now();
        let outcome = self.inner.generate(prompt, options).await;
        Self::close_span(&mut span, started, &outcome);
        outcome
    }

    async fn generate_with_tools(
        &self,
        prompt: &str,
        tools: &[Arc<dyn Tool>],
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let mut span = self.open_span("llm.generate_with_tools", prompt);
        span.set_attribute("tools.count", json!(tools.len()));
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        span.set_attribute("tools", json!(names.join(",")));
        let started = Instant::now();
        let outcome = self.inner.generate_with_tools(prompt, tools, options).await;
        Self::close_span(&mut span, started, &outcome);
        outcome
    }

    fn capabilities(&self) -> Capabilities {
        self.inner.capabilities()
    }
}
