use clap::{Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;

use crate::config::parse_provider;

/// Threat-model generator: Mermaid data flow diagrams with STRIDE analysis
#[derive(Parser, Debug)]
#[command(
    name = "dfdgen",
    about = "Generate data flow diagrams and STRIDE threat analyses with an LLM",
    version,
    author,
    long_about = "dfdgen asks a language model for a Mermaid data flow diagram and a STRIDE \
                  threat table for a described system. When a code repository is given, the \
                  model can inspect its file tree through the codebase_tree tool before \
                  answering."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate a data flow diagram and threat analysis",
        long_about = "Sends the use case to the model and prints the diagram followed by the \
                      STRIDE threat analysis.\n\n\
                      Examples:\n  \
                      dfdgen generate --use-case \"Online bookstore with card payments\"\n  \
                      dfdgen generate -u \"Payment API\" --repo https://github.com/acme/payments\n  \
                      dfdgen generate --provider ollama --model llama3.1 --format json"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Print the file tree the model would see for a repository",
        long_about = "Runs only the repository summarizer, for checking exclusions.\n\n\
                      Examples:\n  \
                      dfdgen tree .\n  \
                      dfdgen tree https://github.com/acme/payments/tree/main/api"
    )]
    Tree(TreeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        short = 'u',
        long,
        value_name = "TEXT",
        help = "System use case to model (prompted on stdin when omitted)"
    )]
    pub use_case: Option<String>,

    #[arg(
        short = 'r',
        long,
        value_name = "REPO",
        help = "Repository URL or local path the model may inspect"
    )]
    pub repo: Option<String>,

    #[arg(
        short = 'p',
        long,
        value_parser = parse_adapter_kind,
        help = "Model provider (overrides DFDGEN_PROVIDER)"
    )]
    pub provider: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name (overrides DFDGEN_MODEL)"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Model request timeout in seconds"
    )]
    pub timeout: Option<u64>,

    #[arg(long, value_name = "TEMP", help = "Sampling temperature (0.0-2.0)")]
    pub temperature: Option<f32>,

    #[arg(long, value_name = "TOKENS", help = "Output token cap per request")]
    pub max_tokens: Option<u32>,

    #[arg(
        short = 'x',
        long = "exclude",
        value_name = "GLOB",
        help = "Additional gitignore-style pattern to hide from the tree (repeatable)"
    )]
    pub exclude: Vec<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        help = "Print the whole answer as the diagram when the threat heading is missing"
    )]
    pub lenient: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TreeArgs {
    #[arg(value_name = "REPO", help = "Repository URL or local path")]
    pub repo: String,

    #[arg(
        short = 'x',
        long = "exclude",
        value_name = "GLOB",
        help = "Additional gitignore-style pattern to hide from the tree (repeatable)"
    )]
    pub exclude: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => super::output::OutputFormat::Human,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    parse_provider(s).map_err(|e| e.to_string())
}
