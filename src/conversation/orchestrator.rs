//! Tool-augmented chat completion
//!
//! A run makes at most two model requests:
//!
//! 1. The full history plus the tool definitions. If the model finishes
//!    with `tool_calls`, every requested call is dispatched and answered.
//! 2. The extended history without tools, whose answer is final.
//!
//! A direct answer in phase 1 skips phase 2. Model failures are not retried.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::history::Conversation;
use crate::llm::{BackendError, ChatMessage, FinishReason, LLMClient, LLMRequest, LLMResponse};
use crate::tools::ToolDispatcher;

pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initial,
    ToolAugmented,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Initial => write!(f, "initial request"),
            Phase::ToolAugmented => write!(f, "tool-augmented request"),
        }
    }
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Model request failed during {phase}: {source}")]
    Backend {
        phase: Phase,
        #[source]
        source: BackendError,
    },

    #[error("Tool calls left without a result: {}", .0.join(", "))]
    UnansweredToolCalls(Vec<String>),
}

/// Sampling parameters shared by both requests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Final answer text
    pub content: String,
    /// Finish reason of the last model response
    pub finish_reason: FinishReason,
    /// Number of tool calls dispatched
    pub tool_calls_serviced: usize,
    /// Number of model requests issued (1 or 2)
    pub model_requests: usize,
}

pub struct Orchestrator {
    client: Arc<dyn LLMClient>,
    dispatcher: ToolDispatcher,
    settings: GenerationSettings,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn LLMClient>,
        dispatcher: ToolDispatcher,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            client,
            dispatcher,
            settings,
        }
    }

    /// Runs both phases over `conversation`, appending every exchanged message
    pub async fn run(
        &self,
        conversation: &mut Conversation,
    ) -> Result<GenerationOutcome, OrchestratorError> {
        debug!(tools = ?self.dispatcher.tool_names(), "Offering tools to the model");
        let initial = LLMRequest::new(conversation.messages().to_vec())
            .with_tools(self.dispatcher.as_tool_definitions());
        let response = self.send(initial, Phase::Initial).await?;

        if !response.requests_tools() {
            if response.finish_reason == FinishReason::ToolCalls {
                warn!("Model finished with tool_calls but requested none; using its content");
            }
            info!(finish_reason = %response.finish_reason, "Model answered directly");
            conversation.push(ChatMessage::assistant(response.content.clone()));
            return Ok(GenerationOutcome {
                content: response.content,
                finish_reason: response.finish_reason,
                tool_calls_serviced: 0,
                model_requests: 1,
            });
        }

        let calls = response.tool_calls;
        info!(count = calls.len(), "Model requested tool calls");

        conversation.push(ChatMessage::assistant_with_tools(
            response.content,
            calls.clone(),
        ));
        conversation.extend(self.dispatcher.dispatch_all(&calls).await);

        let pending = conversation.pending_tool_calls();
        if !pending.is_empty() {
            return Err(OrchestratorError::UnansweredToolCalls(pending));
        }

        let follow_up = LLMRequest::new(conversation.messages().to_vec());
        let response = self.send(follow_up, Phase::ToolAugmented).await?;

        if response.has_tool_calls() {
            warn!(
                count = response.tool_calls.len(),
                "Ignoring tool calls in the final response"
            );
        }

        conversation.push(ChatMessage::assistant(response.content.clone()));
        Ok(GenerationOutcome {
            content: response.content,
            finish_reason: response.finish_reason,
            tool_calls_serviced: calls.len(),
            model_requests: 2,
        })
    }

    async fn send(
        &self,
        request: LLMRequest,
        phase: Phase,
    ) -> Result<LLMResponse, OrchestratorError> {
        let request = request
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        debug!(
            %phase,
            messages = request.messages.len(),
            tools = request.tools.len(),
            client = self.client.name(),
            "Sending model request"
        );

        let response = self
            .client
            .chat(request)
            .await
            .map_err(|source| OrchestratorError::Backend { phase, source })?;

        debug!(
            %phase,
            finish_reason = %response.finish_reason,
            elapsed_ms = response.response_time.as_millis() as u64,
            "Model request completed"
        );
        Ok(response)
    }
}
