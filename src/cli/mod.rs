pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, GenerateArgs, TreeArgs};
pub use handlers::{generate, handle_generate, handle_tree};
pub use output::{OutputFormat, OutputFormatter};
