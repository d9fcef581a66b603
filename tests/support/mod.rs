//! Shared helpers for integration tests

use async_trait::async_trait;
use dfdgen::ingest::{ExclusionSet, RepositorySummarizer, RetrievalError};
use std::sync::Mutex;

/// Summarizer returning a fixed tree and recording the identifiers it saw
pub struct StubSummarizer {
    tree: String,
    seen: Mutex<Vec<String>>,
}

impl StubSummarizer {
    pub fn new(tree: impl Into<String>) -> Self {
        Self {
            tree: tree.into(),
            seen: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositorySummarizer for StubSummarizer {
    async fn summarize(
        &self,
        identifier: &str,
        _exclusions: &ExclusionSet,
    ) -> Result<String, RetrievalError> {
        self.seen.lock().unwrap().push(identifier.to_string());
        Ok(self.tree.clone())
    }
}

pub const DIAGRAM_ANSWER: &str = "\
```mermaid
flowchart TB
  subgraph Internet
    User([Customer])
  end
  subgraph Application
    API((API))
    DB[(Orders)]
  end
  User -->|HTTPS| API
  API -->|SQL| DB
```
### Threat Analysis (STRIDE)
| Element | STRIDE category | Threat description | Mitigation |
|---|---|---|---|
| API | Spoofing | Forged session tokens | Signed tokens |
";
