use std::collections::HashSet;

use crate::llm::{ChatMessage, MessageRole};

/// Ordered message history of one run. Appending is the only mutation.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a conversation with a system prompt followed by the user prompt
    pub fn with_prompts(system: impl Into<String>, user: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push(ChatMessage::system(system));
        conversation.push(ChatMessage::user(user));
        conversation
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        for message in messages {
            self.push(message);
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Call ids requested by assistant messages that no tool message has answered yet
    pub fn pending_tool_calls(&self) -> Vec<String> {
        let mut pending: Vec<String> = Vec::new();
        let mut answered: HashSet<&str> = HashSet::new();

        for message in &self.messages {
            match message.role {
                MessageRole::Assistant => {
                    if let Some(calls) = &message.tool_calls {
                        pending.extend(calls.iter().map(|c| c.call_id.clone()));
                    }
                }
                MessageRole::Tool => {
                    if let Some(id) = &message.tool_call_id {
                        answered.insert(id.as_str());
                    }
                }
                _ => {}
            }
        }

        pending.retain(|id| !answered.contains(id.as_str()));
        pending
    }
}
