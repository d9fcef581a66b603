use tracing::{info, warn};

use super::registry::ToolRegistry;
use super::trait_def::ToolError;
use crate::llm::{ChatMessage, ToolCall, ToolDefinition};

/// Resolves model tool calls into tool result messages.
///
/// Dispatch never fails: argument and retrieval problems become the text of
/// the tool result so the model can still answer.
pub struct ToolDispatcher {
    registry: ToolRegistry,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub async fn dispatch(&self, call: &ToolCall) -> ChatMessage {
        info!(tool = %call.name, call_id = %call.call_id, "Tool call requested");

        let result = match self.registry.get_tool(&call.name) {
            Some(tool) => tool.execute(&call.arguments).await,
            None => Err(ToolError::Unsupported(call.name.clone())),
        };

        let content = match result {
            Ok(output) => {
                info!(tool = %call.name, output_len = output.len(), "Tool execution completed");
                output
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                e.to_string()
            }
        };

        ChatMessage::tool_response(call.call_id.clone(), content)
    }

    /// Dispatches every call in order; result `i` answers call `i`
    pub async fn dispatch_all(&self, calls: &[ToolCall]) -> Vec<ChatMessage> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.dispatch(call).await);
        }
        results
    }

    pub fn as_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry.as_tool_definitions()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.registry.tool_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{ExclusionSet, RepositorySummarizer, RetrievalError};
    use crate::llm::MessageRole;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSummarizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RepositorySummarizer for CountingSummarizer {
        async fn summarize(
            &self,
            identifier: &str,
            _exclusions: &ExclusionSet,
        ) -> Result<String, RetrievalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if identifier.contains("private") {
                return Err(RetrievalError::CloneFailed {
                    url: identifier.to_string(),
                    message: "authentication required".to_string(),
                });
            }
            Ok(format!("{}/\n  main.ext\n", identifier.rsplit('/').next().unwrap()))
        }
    }

    fn dispatcher() -> (ToolDispatcher, Arc<CountingSummarizer>) {
        let summarizer = Arc::new(CountingSummarizer {
            calls: AtomicUsize::new(0),
        });
        let registry = ToolRegistry::with_codebase_tree(summarizer.clone(), ExclusionSet::default());
        (ToolDispatcher::new(registry), summarizer)
    }

    #[tokio::test]
    async fn test_valid_call_echoes_call_id() {
        let (dispatcher, _) = dispatcher();
        for (id, link) in [
            ("call_1", "https://example.com/repo"),
            ("abc", "./local/path"),
            ("call_zz", "git@example.com:team/service.git"),
        ] {
            let call = ToolCall::new(id, "codebase_tree", format!(r#"{{"gitrepo_link":"{}"}}"#, link));
            let result = dispatcher.dispatch(&call).await;
            assert_eq!(result.role, MessageRole::Tool);
            assert_eq!(result.tool_call_id.as_deref(), Some(id));
        }
    }

    #[tokio::test]
    async fn test_tree_becomes_content() {
        let (dispatcher, summarizer) = dispatcher();
        let call = ToolCall::new(
            "call_1",
            "codebase_tree",
            r#"{"gitrepo_link": "https://example.com/repo"}"#,
        );

        let result = dispatcher.dispatch(&call).await;

        assert_eq!(result.content, "repo/\n  main.ext\n");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_arguments_are_reported() {
        let (dispatcher, summarizer) = dispatcher();
        for payload in [
            "",
            "not json",
            r#"{"gitrepo_link": "#,
            "{}",
            r#"{"gitrepo_link": 42}"#,
            r#""https://example.com/repo""#,
            r#"{"gitrepo_link": "https://example.com/repo", "extra": true}"#,
        ] {
            let call = ToolCall::new("call_x", "codebase_tree", payload);
            let result = dispatcher.dispatch(&call).await;
            assert!(
                result
                    .content
                    .starts_with("Error parsing tool call arguments:"),
                "payload {:?} gave {:?}",
                payload,
                result.content
            );
            assert_eq!(result.tool_call_id.as_deref(), Some("call_x"));
        }
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retrieval_error_is_reported() {
        let (dispatcher, _) = dispatcher();
        let call = ToolCall::new(
            "call_2",
            "codebase_tree",
            r#"{"gitrepo_link": "https://example.com/private"}"#,
        );

        let result = dispatcher.dispatch(&call).await;

        assert!(result.content.starts_with("Error retrieving repository tree:"));
        assert!(result.content.contains("authentication required"));
        assert_eq!(result.tool_call_id.as_deref(), Some("call_2"));
    }

    #[tokio::test]
    async fn test_unsupported_tool() {
        let (dispatcher, summarizer) = dispatcher();
        let call = ToolCall::new("call_3", "read_file", r#"{"path": "Cargo.toml"}"#);

        let result = dispatcher.dispatch(&call).await;

        assert_eq!(result.content, "Unsupported tool: read_file");
        assert_eq!(result.tool_call_id.as_deref(), Some("call_3"));
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_all_preserves_order() {
        let (dispatcher, summarizer) = dispatcher();
        let calls = vec![
            ToolCall::new("a", "codebase_tree", r#"{"gitrepo_link": "https://x.dev/one"}"#),
            ToolCall::new("b", "codebase_tree", "oops"),
            ToolCall::new("c", "codebase_tree", r#"{"gitrepo_link": "https://x.dev/two"}"#),
        ];

        let results = dispatcher.dispatch_all(&calls).await;

        let ids: Vec<_> = results
            .iter()
            .map(|m| m.tool_call_id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(results[0].content, "one/\n  main.ext\n");
        assert!(results[1].content.starts_with("Error parsing tool call arguments:"));
        assert_eq!(results[2].content, "two/\n  main.ext\n");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 2);
    }
}
