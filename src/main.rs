use binderpack::cli::commands::{CliArgs, Commands};
use binderpack::cli::handlers::{handle_detect, handle_list, handle_plan, load_config};
use binderpack::util::logging::{init_logging, LoggingConfig};
use binderpack::VERSION;

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    let config = load_config(&args);
    init_logging(LoggingConfig::from_config(&config));

    debug!("binderpack v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Detect(repo_args) => handle_detect(repo_args, &config),
        Commands::Plan(repo_args) => handle_plan(repo_args, &config),
        Commands::List(list_args) => handle_list(list_args, &config),
    };

    std::process::exit(exit_code);
}
