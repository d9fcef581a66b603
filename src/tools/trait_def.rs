use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::ingest::RetrievalError;

/// Why a tool could not produce its output.
///
/// The `Display` text is what the model receives as the tool result.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Error parsing tool call arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error("Error retrieving repository tree: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("Unsupported tool: {0}")]
    Unsupported(String),
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> Value;
    /// Runs the tool on the raw argument payload emitted by the model
    async fn execute(&self, arguments: &str) -> Result<String, ToolError>;
}
