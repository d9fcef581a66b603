use dfdgen::cli::commands::{CliArgs, Commands};
use dfdgen::cli::handlers::{handle_generate, handle_tree};
use dfdgen::util::logging::{self, parse_level};
use dfdgen::{NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let log_level = init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => handle_generate(generate_args, log_level).await,
        Commands::Tree(tree_args) => handle_tree(tree_args, log_level).await,
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) -> Level {
    let mut config = logging::config_from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    let level = config.level;
    logging::init_logging(config);
    level
}
