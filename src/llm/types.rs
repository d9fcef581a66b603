//! LLM communication types
//!
//! This module defines the types used for LLM request/response communication,
//! independent of any specific provider implementation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions
    System,
    /// User message
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool response
    Tool,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Text content of the message, possibly empty
    pub content: String,
    /// Tool calls made by the assistant (only for Assistant role)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Tool call ID this message responds to (only for Tool role)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates an assistant message carrying the tool calls the model requested
    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    /// Creates a tool result message answering the call with `call_id`
    pub fn tool_response(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
        }
    }
}

/// A tool call requested by the LLM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub call_id: String,
    /// Name of the tool to call
    pub name: String,
    /// Serialized argument object, kept verbatim so malformed payloads can be reported
    pub arguments: String,
}

impl ToolCall {
    pub fn new(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Definition of a tool available to the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the tool's parameters
    pub parameters: serde_json::Value,
}

/// Request to send to the LLM
#[derive(Debug, Clone)]
pub struct LLMRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Tools available for the LLM to use
    pub tools: Vec<ToolDefinition>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl LLMRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural end of the answer
    Stop,
    /// The model is waiting for tool results
    ToolCalls,
    /// The output token cap was reached
    Length,
    /// Provider-specific reason
    Other(String),
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "stop"),
            FinishReason::ToolCalls => write!(f, "tool_calls"),
            FinishReason::Length => write!(f, "length"),
            FinishReason::Other(reason) => write!(f, "{}", reason),
        }
    }
}

/// Response from the LLM
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// Text content of the response
    pub content: String,
    /// Tool calls requested by the LLM
    pub tool_calls: Vec<ToolCall>,
    /// Why generation ended
    pub finish_reason: FinishReason,
    /// Time taken for the request
    pub response_time: Duration,
}

impl LLMResponse {
    /// Creates a plain text response that finished normally
    pub fn text(content: impl Into<String>, response_time: Duration) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            finish_reason: FinishReason::Stop,
            response_time,
        }
    }

    /// Creates a response requesting tool calls
    pub fn with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCall>,
        response_time: Duration,
    ) -> Self {
        Self {
            content: content.into(),
            tool_calls,
            finish_reason: FinishReason::ToolCalls,
            response_time,
        }
    }

    pub fn with_finish_reason(mut self, finish_reason: FinishReason) -> Self {
        self.finish_reason = finish_reason;
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// True when the model stopped to wait for tool results it asked for
    pub fn requests_tools(&self) -> bool {
        self.finish_reason == FinishReason::ToolCalls && self.has_tool_calls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_creation() {
        let system = ChatMessage::system("You are a threat modeling assistant");
        assert_eq!(system.role, MessageRole::System);
        assert_eq!(system.content, "You are a threat modeling assistant");

        let user = ChatMessage::user("Online bookstore");
        assert_eq!(user.role, MessageRole::User);

        let assistant = ChatMessage::assistant("flowchart TB");
        assert_eq!(assistant.role, MessageRole::Assistant);
        assert!(assistant.tool_calls.is_none());
    }

    #[test]
    fn test_tool_response() {
        let response = ChatMessage::tool_response("call_123", "repo/\n  main.rs\n");
        assert_eq!(response.role, MessageRole::Tool);
        assert_eq!(response.tool_call_id, Some("call_123".to_string()));
    }

    #[test]
    fn test_assistant_with_tools() {
        let tool_call = ToolCall::new(
            "call_1",
            "codebase_tree",
            r#"{"gitrepo_link":"https://example.com/repo"}"#,
        );

        let msg = ChatMessage::assistant_with_tools("", vec![tool_call]);
        assert_eq!(msg.tool_calls.as_ref().map(Vec::len), Some(1));
        assert!(msg.content.is_empty());
    }

    #[test]
    fn test_tool_message_serializes_call_id() {
        let json = serde_json::to_value(ChatMessage::tool_response("call_9", "tree")).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_9");
        assert!(json.get("tool_calls").is_none());
    }

    #[test]
    fn test_llm_request_builder() {
        let request = LLMRequest::new(vec![ChatMessage::user("Hello")])
            .with_temperature(0.2)
            .with_max_tokens(1500);

        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(1500));
        assert!(request.tools.is_empty());
    }

    #[test]
    fn test_finish_reason_display() {
        assert_eq!(FinishReason::Stop.to_string(), "stop");
        assert_eq!(FinishReason::ToolCalls.to_string(), "tool_calls");
        assert_eq!(FinishReason::Length.to_string(), "length");
        assert_eq!(
            FinishReason::Other("content_filter".to_string()).to_string(),
            "content_filter"
        );
    }

    #[test]
    fn test_llm_response() {
        let response = LLMResponse::text("Hello!", Duration::from_millis(100));
        assert!(!response.has_tool_calls());
        assert!(!response.requests_tools());
        assert_eq!(response.finish_reason, FinishReason::Stop);

        let with_tools = LLMResponse::with_tool_calls(
            "",
            vec![ToolCall::new("1", "codebase_tree", "{}")],
            Duration::from_millis(50),
        );
        assert!(with_tools.requests_tools());

        let truncated = with_tools.with_finish_reason(FinishReason::Length);
        assert!(!truncated.requests_tools());
    }
}
