//! Tool registry
//!
//! Holds the tools offered to the model and resolves calls by name.

use std::sync::Arc;

use super::codebase_tree::CodebaseTreeTool;
use super::trait_def::Tool;
use crate::ingest::{ExclusionSet, RepositorySummarizer};
use crate::llm::ToolDefinition;

pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Registry offering only `codebase_tree`, backed by `summarizer`
    pub fn with_codebase_tree(
        summarizer: Arc<dyn RepositorySummarizer>,
        exclusions: ExclusionSet,
    ) -> Self {
        Self::new(vec![Arc::new(CodebaseTreeTool::new(summarizer, exclusions))])
    }

    pub fn as_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.schema(),
            })
            .collect()
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::TreeSummarizer;

    fn registry() -> ToolRegistry {
        ToolRegistry::with_codebase_tree(
            Arc::new(TreeSummarizer::default()),
            ExclusionSet::default(),
        )
    }

    #[test]
    fn test_registry_creation() {
        let registry = registry();
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
        assert_eq!(registry.tool_names(), vec!["codebase_tree"]);
    }

    #[test]
    fn test_get_tool() {
        let registry = registry();
        assert!(registry.get_tool("codebase_tree").is_some());
        assert!(registry.get_tool("read_file").is_none());
    }

    #[test]
    fn test_as_tool_definitions() {
        let definitions = registry().as_tool_definitions();
        assert_eq!(definitions.len(), 1);

        let def = &definitions[0];
        assert_eq!(def.name, "codebase_tree");
        assert!(!def.description.is_empty());
        assert_eq!(def.parameters["additionalProperties"], false);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new(Vec::new());
        assert!(registry.is_empty());
        assert!(registry.as_tool_definitions().is_empty());
    }
}
