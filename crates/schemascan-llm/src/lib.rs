//! Schemascan LLM - text-generation collaborator abstraction.
//!
//! This crate provides a unified interface for the external model that
//! performs the actual violation judgments. The interface is deliberately
//! narrow: a synchronous request/response completion call with an optional
//! JSON response mode. Callers own prompt construction and response
//! normalization; this crate owns transport and wire formats.
//!
//! # Example
//!
//! ```rust,ignore
//! use schemascan_llm::{CompletionRequest, LlmProvider, OpenAiProvider};
//!
//! let provider = OpenAiProvider::new("sk-...")?;
//! let request = CompletionRequest::new("Evaluate this page")
//!     .with_system_prompt("You are a compliance evaluator")
//!     .with_temperature(0.2)
//!     .with_json_mode();
//! let response = provider.complete(request).await?;
//! println!("{}", response.content);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod provider;
pub mod providers;

// Re-export commonly used types
pub use error::{LlmError, Result};
pub use provider::{CompletionRequest, CompletionResponse, LlmProvider, Message, Role, Usage};
pub use providers::OpenAiProvider;
