use async_trait::async_trait;
use serde::de::Error as _;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use super::trait_def::{Tool, ToolError};
use crate::ingest::{ExclusionSet, RepositorySummarizer};

pub const CODEBASE_TREE_TOOL: &str = "codebase_tree";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodebaseTreeArgs {
    pub gitrepo_link: String,
}

impl CodebaseTreeArgs {
    pub fn parse(arguments: &str) -> Result<Self, serde_json::Error> {
        let args: Self = serde_json::from_str(arguments)?;
        if args.gitrepo_link.trim().is_empty() {
            return Err(serde_json::Error::custom("gitrepo_link must not be empty"));
        }
        Ok(args)
    }
}

/// Returns the file tree of a repository given by URL or local path
pub struct CodebaseTreeTool {
    summarizer: Arc<dyn RepositorySummarizer>,
    exclusions: ExclusionSet,
}

impl CodebaseTreeTool {
    pub fn new(summarizer: Arc<dyn RepositorySummarizer>, exclusions: ExclusionSet) -> Self {
        Self {
            summarizer,
            exclusions,
        }
    }
}

#[async_trait]
impl Tool for CodebaseTreeTool {
    fn name(&self) -> &'static str {
        CODEBASE_TREE_TOOL
    }

    fn description(&self) -> &'static str {
        "Ingest a git repository link and return the code base tree structure as a string. \
         Call this function to understand the architecture and components of the codebase."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "gitrepo_link": {
                    "type": "string",
                    "description": "URL to the Git repository to be ingested"
                }
            },
            "required": ["gitrepo_link"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args = CodebaseTreeArgs::parse(arguments)?;
        info!(gitrepo_link = %args.gitrepo_link, "Ingesting codebase");

        let tree = self
            .summarizer
            .summarize(&args.gitrepo_link, &self.exclusions)
            .await?;

        debug!(
            tree_len = tree.len(),
            tree_preview = %tree.chars().take(200).collect::<String>(),
            "Codebase tree obtained"
        );
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::RetrievalError;
    use std::path::PathBuf;

    struct FixedSummarizer(&'static str);

    #[async_trait]
    impl RepositorySummarizer for FixedSummarizer {
        async fn summarize(
            &self,
            _identifier: &str,
            _exclusions: &ExclusionSet,
        ) -> Result<String, RetrievalError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingSummarizer;

    #[async_trait]
    impl RepositorySummarizer for FailingSummarizer {
        async fn summarize(
            &self,
            identifier: &str,
            _exclusions: &ExclusionSet,
        ) -> Result<String, RetrievalError> {
            Err(RetrievalError::NotFound(PathBuf::from(identifier)))
        }
    }

    fn tool(summarizer: impl RepositorySummarizer + 'static) -> CodebaseTreeTool {
        CodebaseTreeTool::new(Arc::new(summarizer), ExclusionSet::default())
    }

    #[test]
    fn test_schema_is_strict() {
        let schema = tool(FixedSummarizer("")).schema();
        assert_eq!(schema["required"], json!(["gitrepo_link"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["gitrepo_link"]["type"], "string");
    }

    #[tokio::test]
    async fn test_execute_returns_tree() {
        let output = tool(FixedSummarizer("repo/\n  main.rs\n"))
            .execute(r#"{"gitrepo_link": "https://example.com/repo"}"#)
            .await
            .unwrap();
        assert_eq!(output, "repo/\n  main.rs\n");
    }

    #[tokio::test]
    async fn test_missing_field() {
        let err = tool(FixedSummarizer(""))
            .execute(r#"{"url": "https://example.com/repo"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_extra_field_is_rejected() {
        let err = tool(FixedSummarizer(""))
            .execute(r#"{"gitrepo_link": "https://example.com/repo", "depth": 3}"#)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Error parsing tool call arguments:"));
    }

    #[tokio::test]
    async fn test_blank_link_is_rejected() {
        let err = tool(FixedSummarizer(""))
            .execute(r#"{"gitrepo_link": "  "}"#)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[tokio::test]
    async fn test_retrieval_failure() {
        let err = tool(FailingSummarizer)
            .execute(r#"{"gitrepo_link": "/no/such/repo"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Retrieval(_)));
        assert_eq!(
            err.to_string(),
            "Error retrieving repository tree: Repository path does not exist: /no/such/repo"
        );
    }
}
