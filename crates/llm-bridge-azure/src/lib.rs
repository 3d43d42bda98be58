//! Azure OpenAI adapter for llm-bridge.
//!
//! Azure hosts the Chat Completions API behind a different URL scheme
//! (resource endpoint + deployment + api-version) and `api-key`
//! authentication; the request and response bodies are the same as
//! OpenAI's, so this crate reuses the OpenAI wire turns and reasoning-model
//! rules from `llm-bridge-openai` and owns only what Azure does
//! differently.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use llm_bridge::{GenerateOptions, Llm};
//! use llm_bridge_azure::{AzureClient, AzureConfig};
//!
//! # async fn example() -> Result<(), llm_bridge::LlmError> {
//! let client = AzureClient::new(AzureConfig {
//!     api_key: std::env::var("AZURE_OPENAI_API_KEY").unwrap(),
//!     endpoint: "https://my-resource.openai.azure.com".into(),
//!     deployment: "gpt-4o-mini".into(),
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

mod client;
mod config;
mod wire;

pub use client::AzureClient;
pub use config::AzureConfig;
