//! Configuration management for dfdgen
//!
//! Settings are loaded from environment variables with defaults and can be
//! overridden from the command line before validation.
//!
//! # Environment Variables
//!
//! - `DFDGEN_PROVIDER`: provider (openai|ollama|anthropic|gemini|xai|groq|...) - default: "openai"
//! - `DFDGEN_MODEL`: model name - default: "gpt-4o-mini"
//! - `DFDGEN_TEMPERATURE`: sampling temperature - default: "0.2"
//! - `DFDGEN_MAX_TOKENS`: output token cap per request - default: "1500"
//! - `DFDGEN_REQUEST_TIMEOUT`: model request timeout in seconds - default: "120"
//! - `DFDGEN_CLONE_TIMEOUT`: repository clone timeout in seconds - default: "300"
//! - `DFDGEN_MAX_TREE_ENTRIES`: entry cap for repository trees - default: "10000"
//! - `DFDGEN_API_BASE_URL`: custom endpoint for the provider - optional
//! - `DFDGEN_LOG_LEVEL`: logging level - default: "warn"
//!
//! Credentials are read by genai from the provider's standard variable
//! (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, ...).

use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::conversation::{GenerationSettings, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::ingest::{TreeSummarizer, DEFAULT_CLONE_TIMEOUT_SECS, DEFAULT_MAX_TREE_ENTRIES};
use crate::llm::{GenAIClient, LLMClient};
use crate::util::logging::level_from_str;

const DEFAULT_PROVIDER: AdapterKind = AdapterKind::OpenAI;
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: openai, ollama, anthropic, gemini, xai, groq")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// State of the provider credential found in the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStatus {
    /// The provider needs no key (e.g. a local Ollama)
    NotRequired,
    /// The key variable is unset or empty
    Missing { var: &'static str },
    /// The key is present but does not look like a key for this provider
    Malformed { var: &'static str },
    /// The key looks plausible
    Present { var: &'static str },
}

impl CredentialStatus {
    pub fn is_usable(&self) -> bool {
        matches!(
            self,
            CredentialStatus::NotRequired | CredentialStatus::Present { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DfdgenConfig {
    pub provider: AdapterKind,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub clone_timeout_secs: u64,
    pub max_tree_entries: usize,
    pub api_base_url: Option<String>,
    pub log_level: String,
}

impl Default for DfdgenConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            clone_timeout_secs: DEFAULT_CLONE_TIMEOUT_SECS,
            max_tree_entries: DEFAULT_MAX_TREE_ENTRIES,
            api_base_url: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    AdapterKind::from_lower_str(&name.trim().to_lowercase())
        .ok_or_else(|| ConfigError::InvalidProvider(name.to_string()))
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl DfdgenConfig {
    /// Loads settings from `DFDGEN_*` variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let provider = match env::var("DFDGEN_PROVIDER") {
            Ok(name) if !name.trim().is_empty() => parse_provider(&name)?,
            _ => defaults.provider,
        };

        Ok(Self {
            provider,
            model: env::var("DFDGEN_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.model),
            temperature: env_parse("DFDGEN_TEMPERATURE").unwrap_or(defaults.temperature),
            max_tokens: env_parse("DFDGEN_MAX_TOKENS").unwrap_or(defaults.max_tokens),
            request_timeout_secs: env_parse("DFDGEN_REQUEST_TIMEOUT")
                .unwrap_or(defaults.request_timeout_secs),
            clone_timeout_secs: env_parse("DFDGEN_CLONE_TIMEOUT")
                .unwrap_or(defaults.clone_timeout_secs),
            max_tree_entries: env_parse("DFDGEN_MAX_TREE_ENTRIES")
                .unwrap_or(defaults.max_tree_entries),
            api_base_url: env::var("DFDGEN_API_BASE_URL")
                .ok()
                .filter(|u| !u.trim().is_empty()),
            log_level: env::var("DFDGEN_LOG_LEVEL")
                .unwrap_or(defaults.log_level)
                .to_lowercase(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max tokens must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.clone_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Clone timeout must be at least 1 second".to_string(),
            ));
        }
        if self.max_tree_entries == 0 {
            return Err(ConfigError::ValidationFailed(
                "Tree entry limit must be at least 1".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name must not be empty".to_string(),
            ));
        }

        if level_from_str(&self.log_level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Inspects the provider's credential variable without failing
    pub fn credential_status(&self) -> CredentialStatus {
        let Some(var) = self.provider.default_key_env_name() else {
            return CredentialStatus::NotRequired;
        };

        let key = env::var(var).unwrap_or_default();
        let key = key.trim();
        if key.is_empty() {
            return CredentialStatus::Missing { var };
        }

        let looks_valid = match self.provider {
            AdapterKind::OpenAI => key.starts_with("sk-") && key.len() > 10,
            _ => key.len() > 10,
        };

        if looks_valid {
            CredentialStatus::Present { var }
        } else {
            CredentialStatus::Malformed { var }
        }
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub fn summarizer(&self) -> TreeSummarizer {
        TreeSummarizer::new(
            Duration::from_secs(self.clone_timeout_secs),
            self.max_tree_entries,
        )
    }

    pub fn create_client(&self) -> Arc<dyn LLMClient> {
        Arc::new(GenAIClient::new(
            self.provider,
            self.model.clone(),
            Duration::from_secs(self.request_timeout_secs),
            self.api_base_url.clone(),
        ))
    }
}

impl fmt::Display for DfdgenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dfdgen configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Temperature: {}", self.temperature)?;
        writeln!(f, "  Max Tokens: {}", self.max_tokens)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Clone Timeout: {}s", self.clone_timeout_secs)?;
        writeln!(f, "  Max Tree Entries: {}", self.max_tree_entries)?;
        if let Some(ref url) = self.api_base_url {
            writeln!(f, "  API Base URL: {}", url)?;
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
