//! OpenAI Chat Completions adapter for llm-bridge.
//!
//! Implements [`Llm`](llm_bridge::Llm) against the Chat Completions API,
//! including tool calling, structured output, and the sampling-parameter
//! reconciliation reasoning models require (fixed temperature, no
//! `top_p`).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use llm_bridge::{GenerateOptions, Llm};
//! use llm_bridge_openai::{OpenAiClient, OpenAiConfig};
//!
//! # async fn example() -> Result<(), llm_bridge::LlmError> {
//! let client = OpenAiClient::new(OpenAiConfig {
//!     api_key: std::env::var("OPENAI_API_KEY").unwrap(),
//!     model: "gpt-4o-mini".into(),
//!     ..Default::default()
//! });
//!
//! let answer = client
//!     .generate("Hello!", &GenerateOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod convert;
mod format;
mod provider;
pub mod reasoning;
mod types;

pub use config::OpenAiConfig;
pub use format::OpenAiFormat;
pub use provider::OpenAiClient;
pub use types::{FunctionCallOut, ToolCallOut, WireMessage};
