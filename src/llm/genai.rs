//! GenAI-based LLM client implementation
//!
//! This module provides an LLM client implementation using the `genai` crate,
//! supporting multiple providers (OpenAI, Ollama, Anthropic, Gemini, xAI, Groq).

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{
    ChatMessage, FinishReason, LLMRequest, LLMResponse, MessageRole, ToolCall, ToolDefinition,
};
use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{
    ChatMessage as GenAIChatMessage, ChatOptions, ChatRequest as GenAIChatRequest, MessageContent,
    Tool as GenAITool, ToolResponse,
};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// GenAI-based LLM client supporting multiple providers
pub struct GenAIClient {
    client: Client,
    model: String,
    provider: AdapterKind,
    timeout: Duration,
}

impl GenAIClient {
    /// Creates a new GenAI client
    ///
    /// # Arguments
    ///
    /// * `provider` - LLM provider to use
    /// * `model` - Model name (without provider prefix)
    /// * `timeout` - Per-request timeout
    /// * `endpoint` - Optional base URL overriding the provider default
    pub fn new(
        provider: AdapterKind,
        model: String,
        timeout: Duration,
        endpoint: Option<String>,
    ) -> Self {
        let client = if let Some(endpoint_url) = endpoint {
            debug!(
                "Using custom endpoint for {}: {}",
                provider.as_str(),
                endpoint_url
            );

            let model_clone = model.clone();

            let resolver = ServiceTargetResolver::from_resolver_fn(
                move |_service_target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
                    let endpoint = Endpoint::from_owned(endpoint_url.clone());

                    let auth = match provider.default_key_env_name() {
                        Some(api_key_var) => AuthData::from_env(api_key_var),
                        None => AuthData::from_single(""),
                    };

                    Ok(ServiceTarget {
                        endpoint,
                        auth,
                        model: ModelIden::new(provider, &model_clone),
                    })
                },
            );

            Client::builder()
                .with_service_target_resolver(resolver)
                .build()
        } else {
            Client::default()
        };

        debug!(
            "Creating GenAI client: provider={}, model={}",
            provider.as_str(),
            model,
        );

        Self {
            client,
            model,
            provider,
            timeout,
        }
    }

    /// Converts one history entry. An assistant turn carrying both text and
    /// tool calls becomes two provider messages, text first, since a
    /// tool-call message has no room for text.
    fn convert_message(&self, msg: &ChatMessage) -> Vec<GenAIChatMessage> {
        match msg.role {
            MessageRole::System => vec![GenAIChatMessage::system(&msg.content)],
            MessageRole::User => vec![GenAIChatMessage::user(&msg.content)],
            MessageRole::Assistant => match msg.tool_calls {
                Some(ref tool_calls) if !tool_calls.is_empty() => {
                    let genai_calls: Vec<genai::chat::ToolCall> = tool_calls
                        .iter()
                        .map(|tc| genai::chat::ToolCall {
                            call_id: tc.call_id.clone(),
                            fn_name: tc.name.clone(),
                            fn_arguments: arguments_to_value(&tc.arguments),
                        })
                        .collect();

                    let mut converted = Vec::with_capacity(2);
                    if !msg.content.trim().is_empty() {
                        converted.push(GenAIChatMessage::assistant(&msg.content));
                    }
                    converted.push(GenAIChatMessage::assistant(
                        MessageContent::from_tool_calls(genai_calls),
                    ));
                    converted
                }
                _ => vec![GenAIChatMessage::assistant(&msg.content)],
            },
            MessageRole::Tool => vec![ToolResponse {
                call_id: msg.tool_call_id.clone().unwrap_or_default(),
                content: msg.content.clone(),
            }
            .into()],
        }
    }

    fn convert_tool(&self, tool: &ToolDefinition) -> GenAITool {
        GenAITool::new(&tool.name)
            .with_description(&tool.description)
            .with_schema(tool.parameters.clone())
    }
}

/// Replays a stored argument string to the provider; unparseable payloads go back verbatim.
fn arguments_to_value(arguments: &str) -> Value {
    serde_json::from_str(arguments).unwrap_or_else(|_| Value::String(arguments.to_string()))
}

/// genai parses arguments eagerly; a payload it could not parse arrives as a bare string.
fn arguments_to_string(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl LLMClient for GenAIClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let start = std::time::Instant::now();

        let messages: Vec<GenAIChatMessage> = request
            .messages
            .iter()
            .flat_map(|m| self.convert_message(m))
            .collect();

        let mut genai_request = GenAIChatRequest::new(messages);
        if !request.tools.is_empty() {
            let tools: Vec<GenAITool> =
                request.tools.iter().map(|t| self.convert_tool(t)).collect();
            genai_request = genai_request.with_tools(tools);
        }

        let mut options = ChatOptions::default();
        if let Some(temp) = request.temperature {
            options = options.with_temperature(temp as f64);
        }
        if let Some(max_tokens) = request.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }

        let response = match tokio::time::timeout(
            self.timeout,
            self.client
                .exec_chat(&self.model, genai_request, Some(&options)),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!("{} API error: {}", self.provider.as_str(), e);
                return Err(BackendError::from_provider_failure(
                    self.provider.as_str(),
                    &e.to_string(),
                ));
            }
            Err(_) => {
                error!(
                    "{} request timed out after {}s",
                    self.provider.as_str(),
                    self.timeout.as_secs()
                );
                return Err(BackendError::TimeoutError {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let content = response.first_text().unwrap_or_default().to_string();

        let tool_calls: Vec<ToolCall> = response
            .tool_calls()
            .into_iter()
            .map(|tc| ToolCall {
                call_id: tc.call_id.clone(),
                name: tc.fn_name.clone(),
                arguments: arguments_to_string(&tc.fn_arguments),
            })
            .collect();

        // genai folds tool calls into the message content, so their presence
        // is what marks a tool_calls finish.
        let finish_reason = if tool_calls.is_empty() {
            FinishReason::Stop
        } else {
            FinishReason::ToolCalls
        };

        debug!(
            provider = self.provider.as_str(),
            finish_reason = %finish_reason,
            tool_calls = tool_calls.len(),
            content_len = content.len(),
            "Model response received"
        );

        Ok(LLMResponse {
            content,
            tool_calls,
            finish_reason,
            response_time: start.elapsed(),
        })
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_genai_client_creation() {
        let client = GenAIClient::new(
            AdapterKind::OpenAI,
            "gpt-4o-mini".to_string(),
            Duration::from_secs(30),
            None,
        );

        assert_eq!(client.name(), "OpenAI");
        assert_eq!(client.model_info(), Some("gpt-4o-mini".to_string()));
    }

    #[test]
    fn test_arguments_round_trip_through_value() {
        let raw = r#"{"gitrepo_link":"https://example.com/repo"}"#;
        let value = arguments_to_value(raw);
        assert_eq!(value, json!({"gitrepo_link": "https://example.com/repo"}));
        assert_eq!(arguments_to_string(&value), raw);
    }

    #[test]
    fn test_malformed_arguments_stay_verbatim() {
        let raw = r#"{"gitrepo_link": "#;
        let value = arguments_to_value(raw);
        assert_eq!(value, Value::String(raw.to_string()));
        assert_eq!(arguments_to_string(&value), raw);
    }

    #[test]
    fn test_assistant_text_survives_alongside_tool_calls() {
        let client = GenAIClient::new(
            AdapterKind::OpenAI,
            "gpt-4o-mini".to_string(),
            Duration::from_secs(30),
            None,
        );
        let calls = vec![ToolCall::new(
            "call_1",
            "codebase_tree",
            r#"{"gitrepo_link":"https://github.com/acme/shop"}"#,
        )];

        let with_text = ChatMessage::assistant_with_tools("Let me look at the code.", calls.clone());
        assert_eq!(client.convert_message(&with_text).len(), 2);

        let without_text = ChatMessage::assistant_with_tools("", calls);
        assert_eq!(client.convert_message(&without_text).len(), 1);

        let plain = ChatMessage::assistant("done");
        assert_eq!(client.convert_message(&plain).len(), 1);
    }

    #[test]
    fn test_debug_impl() {
        let client = GenAIClient::new(
            AdapterKind::Ollama,
            "llama3".to_string(),
            Duration::from_secs(5),
            Some("http://localhost:11434/".to_string()),
        );
        let debug = format!("{:?}", client);
        assert!(debug.contains("GenAIClient"));
        assert!(debug.contains("llama3"));
    }
}
