use mockforge::cli::commands::{CliArgs, Commands};
use mockforge::cli::handlers::{
    handle_config, handle_detect, handle_extract, handle_generate, handle_repair,
};
use mockforge::config::MockforgeConfig;
use mockforge::util::logging;
use mockforge::VERSION;

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("mockforge v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args),
        Commands::Generate(generate_args) => handle_generate(generate_args, args.quiet).await,
        Commands::Extract(extract_args) => handle_extract(extract_args),
        Commands::Repair(repair_args) => handle_repair(repair_args),
        Commands::Config(config_args) => handle_config(config_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level_override = if let Some(level) = &args.log_level {
        Some(level.as_str())
    } else if args.verbose {
        Some("debug")
    } else if args.quiet {
        Some("error")
    } else {
        None
    };

    logging::init_from_config(&MockforgeConfig::default(), level_override);
}
