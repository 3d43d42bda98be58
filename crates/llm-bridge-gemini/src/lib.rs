//! Google Gemini adapter for llm-bridge.
//!
//! Implements [`Llm`](llm_bridge::Llm) against the `generateContent` API.
//! Gemini's wire format differs structurally from the chat-completion
//! vendors: turns are `contents` with typed parts, tool calls carry
//! structured argument objects instead of JSON strings, tool results are
//! `functionResponse` parts keyed by function name (the wire has no call
//! ids), and the top-level instruction travels in a dedicated
//! `systemInstruction` field. Mid-history system turns, which the API
//! cannot represent, are folded into user turns with a literal `"System: "`
//! prefix.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use llm_bridge::{GenerateOptions, Llm};
//! use llm_bridge_gemini::{GeminiClient, GeminiConfig};
//!
//! # async fn example() -> Result<(), llm_bridge::LlmError> {
//! let client = GeminiClient::new(GeminiConfig {
//!     api_key: std::env::var("GEMINI_API_KEY").unwrap(),
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
mod types;

pub use config::GeminiConfig;
pub use format::GeminiFormat;
pub use provider::GeminiClient;
