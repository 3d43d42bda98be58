//! Per-request generation options.
//!
//! [`GenerateOptions`] is transient configuration for one call — it is not
//! persisted and not shared across calls. Construct with struct-update
//! syntax:
//!
//! ```rust
//! use llm_bridge::{GenerateOptions, LlmConfig};
//!
//! let options = GenerateOptions {
//!     system_message: Some("You are terse.".into()),
//!     config: LlmConfig {
//!         temperature: 0.2,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::memory::Memory;

/// Default round budget for the tool loop.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Requested reasoning effort for reasoning-capable models.
///
/// Only transmitted for reasoning-capable models; ignored (and never sent)
/// everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningEffort {
    /// Minimal internal reasoning.
    Minimal,
    /// Low effort.
    Low,
    /// Medium effort.
    Medium,
    /// High effort.
    High,
}

impl ReasoningEffort {
    /// The wire representation of the effort level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A named JSON schema the model's output must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    /// Schema name (vendors that name the format on the wire use this).
    pub name: String,
    /// The schema document.
    pub schema: Value,
}

/// Sampling and decoding parameters shared by all vendors.
///
/// Vendor adapters reconcile these against model constraints — reasoning
/// models force `temperature` to 1.0 and drop `top_p` entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Sampling temperature.
    pub temperature: f64,
    /// Nucleus-sampling probability mass.
    pub top_p: f64,
    /// Frequency penalty.
    pub frequency_penalty: f64,
    /// Presence penalty.
    pub presence_penalty: f64,
    /// Sequences at which generation stops. Omitted from requests when empty.
    pub stop_sequences: Vec<String>,
    /// Reasoning effort, transmitted only to reasoning-capable models.
    pub reasoning: Option<ReasoningEffort>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop_sequences: Vec::new(),
            reasoning: None,
        }
    }
}

/// Transient configuration for one generation request.
#[derive(Clone, Default)]
pub struct GenerateOptions {
    /// Top-level instruction, sent the way the vendor expects (leading
    /// system turn, or a dedicated request field for Gemini).
    pub system_message: Option<String>,
    /// Conversation store to replay. When `None`, the history is exactly
    /// the current prompt.
    pub memory: Option<Arc<dyn Memory>>,
    /// Sampling and decoding parameters.
    pub config: LlmConfig,
    /// Structured-output schema. Transmitted only when set.
    pub response_format: Option<ResponseFormat>,
    /// Round budget for the tool loop. `None` means
    /// [`DEFAULT_MAX_ITERATIONS`].
    pub max_iterations: Option<u32>,
}

impl GenerateOptions {
    /// The effective tool-loop round budget.
    pub fn max_iterations(&self) -> u32 {
        match self.max_iterations {
            Some(0) | None => DEFAULT_MAX_ITERATIONS,
            Some(n) => n,
        }
    }
}

impl std::fmt::Debug for GenerateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateOptions")
            .field("system_message", &self.system_message)
            .field("has_memory", &self.memory.is_some())
            .field("config", &self.config)
            .field("response_format", &self.response_format)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}
