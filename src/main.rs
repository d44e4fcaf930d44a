use collate_localpublish::cli::{CliArgs, OutputFormatter};
use collate_localpublish::util::{init_with_level, parse_level};
use collate_localpublish::{PublishConfig, PublishOrchestrator, VERSION};

use clap::Parser;
use std::env;
use tracing::{debug, error, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let mut config = match PublishConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    args.apply(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    init_logging_from_args(&args, &config);

    debug!("collate-localpublish v{} starting", VERSION);
    debug!("Arguments: {:?}", args);
    debug!("{}", config);

    let start_dir = match args.from.clone().map(Ok).unwrap_or_else(env::current_dir) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Cannot determine the current directory: {}", e);
            std::process::exit(1);
        }
    };

    let report = match PublishOrchestrator::default()
        .run_with_dotnet(&start_dir, config)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    match OutputFormatter::new(args.format.into()).format(&report) {
        Ok(summary) if !args.quiet => print!("{}", summary),
        Ok(_) => {}
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging_from_args(args: &CliArgs, config: &PublishConfig) {
    let level = match (&args.log_level, args.verbose, args.quiet) {
        (None, true, _) => Level::DEBUG,
        (None, _, true) => Level::ERROR,
        _ => parse_level(&config.log_level),
    };

    init_with_level(level);
}
