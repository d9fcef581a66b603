//! Command handlers for the dfdgen binary
//!
//! Handlers return a process exit code. Failures are logged with
//! `tracing::error!` and mapped to exit code 1.

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn, Level};

use super::commands::{GenerateArgs, TreeArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::{CredentialStatus, DfdgenConfig};
use crate::conversation::{Conversation, GenerationOutcome, GenerationSettings, Orchestrator};
use crate::ingest::{ExclusionSet, RepositorySummarizer};
use crate::llm::LLMClient;
use crate::prompts::{user_prompt, SYSTEM_PROMPT};
use crate::tools::{ToolDispatcher, ToolRegistry};

/// `log_level` is the level logging was initialized with; it replaces the
/// configured one so both agree.
pub async fn handle_generate(args: &GenerateArgs, log_level: Level) -> i32 {
    match run_generate(args, log_level).await {
        Ok(report) => {
            print!("{}", report);
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

pub async fn handle_tree(args: &TreeArgs, log_level: Level) -> i32 {
    match run_tree(args, log_level).await {
        Ok(tree) => {
            println!("{}", tree.trim_end());
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

async fn run_generate(args: &GenerateArgs, log_level: Level) -> Result<String> {
    let config = generate_config(args, log_level)?;
    debug!("{}", config);

    warn_on_credentials(&config);

    let use_case = match &args.use_case {
        Some(text) => text.clone(),
        None => prompt_use_case().await?,
    };
    if use_case.trim().is_empty() {
        bail!("A use case is required to generate a diagram");
    }

    let exclusions = ExclusionSet::default().with_patterns(args.exclude.iter().cloned());
    let summarizer: Arc<dyn RepositorySummarizer> = Arc::new(config.summarizer());

    let outcome = generate(
        config.create_client(),
        summarizer,
        exclusions,
        config.generation_settings(),
        &use_case,
        args.repo.as_deref(),
    )
    .await?;

    OutputFormatter::new(OutputFormat::from(args.format))
        .lenient(args.lenient)
        .format(&outcome.content)
}

async fn run_tree(args: &TreeArgs, log_level: Level) -> Result<String> {
    let mut config = DfdgenConfig::from_env().context("Failed to load configuration")?;
    config.log_level = log_level.to_string().to_lowercase();
    config.validate().context("Configuration error")?;

    let exclusions = ExclusionSet::default().with_patterns(args.exclude.iter().cloned());
    config
        .summarizer()
        .summarize(&args.repo, &exclusions)
        .await
        .with_context(|| format!("Failed to build the tree for {}", args.repo))
}

/// Runs one generation: prompts, both model phases and tool dispatch
pub async fn generate(
    client: Arc<dyn LLMClient>,
    summarizer: Arc<dyn RepositorySummarizer>,
    exclusions: ExclusionSet,
    settings: GenerationSettings,
    use_case: &str,
    repository: Option<&str>,
) -> Result<GenerationOutcome> {
    let registry = ToolRegistry::with_codebase_tree(summarizer, exclusions);
    let orchestrator = Orchestrator::new(client, ToolDispatcher::new(registry), settings);

    let mut conversation =
        Conversation::with_prompts(SYSTEM_PROMPT, user_prompt(use_case, repository));

    info!(repository = repository.unwrap_or("-"), "Generating threat model");
    let outcome = orchestrator
        .run(&mut conversation)
        .await
        .context("Threat model generation failed")?;

    info!(
        model_requests = outcome.model_requests,
        tool_calls = outcome.tool_calls_serviced,
        finish_reason = %outcome.finish_reason,
        "Generation complete"
    );
    Ok(outcome)
}

fn generate_config(args: &GenerateArgs, log_level: Level) -> Result<DfdgenConfig> {
    let mut config = DfdgenConfig::from_env().context("Failed to load configuration")?;
    config.log_level = log_level.to_string().to_lowercase();

    if let Some(provider) = args.provider {
        debug!("Provider overridden to: {:?}", provider);
        config.provider = provider;
    }
    if let Some(model) = &args.model {
        debug!("Model overridden to: {}", model);
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }

    config.validate().context("Configuration error")?;
    Ok(config)
}

fn warn_on_credentials(config: &DfdgenConfig) {
    let status = config.credential_status();
    if status.is_usable() {
        debug!(?status, "Provider credentials look usable");
        return;
    }

    let (var, problem) = match status {
        CredentialStatus::Missing { var } => (var, "is not set"),
        CredentialStatus::Malformed { var } => (var, "does not look like a valid API key"),
        CredentialStatus::NotRequired | CredentialStatus::Present { .. } => return,
    };

    warn!(var, provider = config.provider.as_str(), "Provider API key {}", problem);
    eprintln!(
        "Warning: {} {}. Requests to {} will likely fail.",
        var,
        problem,
        config.provider.as_str()
    );
}

async fn prompt_use_case() -> Result<String> {
    let mut stderr = tokio::io::stderr();
    stderr
        .write_all(b"Describe the system use case: ")
        .await
        .context("Failed to write prompt")?;
    stderr.flush().await.context("Failed to write prompt")?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read use case from stdin")?;
    Ok(line.trim().to_string())
}
