//! LLM client abstraction layer
//!
//! This module provides a trait-based abstraction for LLM communication,
//! allowing the GenAI backend and the scripted mock to be used interchangeably.

mod client;
mod error;
mod genai;
mod mock;
mod types;

pub use client::LLMClient;
pub use error::BackendError;
pub use self::genai::GenAIClient;
pub use mock::{MockLLMClient, MockResponse};
pub use types::{
    ChatMessage, FinishReason, LLMRequest, LLMResponse, MessageRole, ToolCall, ToolDefinition,
};
