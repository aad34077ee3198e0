//! Generative service abstraction
//!
//! The pipeline talks to an [`LLMClient`] trait object so the `genai`-backed
//! client and the scripted [`MockLLMClient`] are interchangeable.

mod client;
mod error;
mod genai;
mod mock;
mod selector;
mod types;

pub use client::LLMClient;
pub use error::{BackendError, ErrorClass};
pub use genai::GenAIClient;
pub use mock::{MockLLMClient, MockResponse};
pub use selector::{provider_has_credentials, select_llm_client, SelectedClient};
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
