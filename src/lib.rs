//! dfdgen - threat-model generator backed by LLM tool calling
//!
//! Given a free-text description of a system, dfdgen asks a language model
//! for a Mermaid data flow diagram followed by a STRIDE threat table. When the
//! model wants to see a code repository it calls the `codebase_tree` tool,
//! which shallow-clones the repository and returns a filtered file tree.
//!
//! # Example Usage
//!
//! ```no_run
//! use dfdgen::conversation::{Conversation, GenerationSettings, Orchestrator};
//! use dfdgen::ingest::{ExclusionSet, TreeSummarizer};
//! use dfdgen::prompts::{user_prompt, SYSTEM_PROMPT};
//! use dfdgen::tools::{ToolDispatcher, ToolRegistry};
//! use dfdgen::DfdgenConfig;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = DfdgenConfig::from_env()?;
//! let registry = ToolRegistry::with_codebase_tree(
//!     Arc::new(TreeSummarizer::default()),
//!     ExclusionSet::default(),
//! );
//! let orchestrator = Orchestrator::new(
//!     config.create_client(),
//!     ToolDispatcher::new(registry),
//!     GenerationSettings::default(),
//! );
//!
//! let mut conversation = Conversation::with_prompts(
//!     SYSTEM_PROMPT,
//!     user_prompt("Online bookstore", Some("https://github.com/acme/shop")),
//! );
//! let outcome = orchestrator.run(&mut conversation).await?;
//! let report = dfdgen::output::split(&outcome.content)?;
//! println!("{}", report.diagram);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`llm`]: model client abstraction, genai-backed client and a mock
//! - [`ingest`]: repository identifiers, cloning and file-tree rendering
//! - [`tools`]: the `codebase_tree` tool, registry and dispatcher
//! - [`conversation`]: message history and the two-phase orchestrator
//! - [`output`]: splitting the answer into diagram and threat sections

pub mod cli;
pub mod config;
pub mod conversation;
pub mod ingest;
pub mod llm;
pub mod output;
pub mod prompts;
pub mod tools;
pub mod util;

pub use config::{ConfigError, CredentialStatus, DfdgenConfig};
pub use conversation::{Conversation, GenerationOutcome, Orchestrator, OrchestratorError};
pub use ingest::{ExclusionSet, RepositorySummarizer, RetrievalError, TreeSummarizer};
pub use llm::{BackendError, GenAIClient, LLMClient};
pub use output::{OutputShapeError, ThreatReport};
pub use tools::{ToolDispatcher, ToolError, ToolRegistry};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_dfdgen() {
        assert_eq!(NAME, "dfdgen");
    }
}
