//! Conversation state and the two-phase tool-calling loop

mod history;
mod orchestrator;

pub use history::Conversation;
pub use orchestrator::{
    GenerationOutcome, GenerationSettings, Orchestrator, OrchestratorError, Phase,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
