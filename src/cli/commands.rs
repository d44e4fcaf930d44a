use crate::config::PublishConfig;
use crate::process::ExitCodePolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Builds the Collate packages and publishes them to a local NuGet source
#[derive(Parser, Debug)]
#[command(
    name = "collate-localpublish",
    about = "Builds the Collate packages and publishes them to a local NuGet source",
    version,
    author,
    long_about = "Resolves the repository root from the starting directory, registers the \
                  local NuGet source if needed, purges cached and stale packages, builds the \
                  projects and pushes the fresh packages into the local source.\n\n\
                  Examples:\n  \
                  collate-localpublish\n  \
                  collate-localpublish --from src/Tomat.Collate.LocalPublish\n  \
                  collate-localpublish --configuration Debug --permissive"
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "DIR",
        help = "Directory to start from (defaults to current directory)"
    )]
    pub from: Option<PathBuf>,

    #[arg(
        short = 'c',
        long,
        value_name = "CONFIGURATION",
        help = "Build configuration (default: Release)"
    )]
    pub configuration: Option<String>,

    #[arg(long, value_name = "NAME", help = "Local NuGet source name")]
    pub registry_name: Option<String>,

    #[arg(
        short = 'j',
        long,
        value_name = "N",
        help = "Run up to N builds or pushes at once"
    )]
    pub jobs: Option<usize>,

    #[arg(long, help = "Continue when dotnet exits with a non-zero status")]
    pub permissive: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Summary format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Verbose logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Command-line values take precedence over the environment.
    pub fn apply(&self, config: &mut PublishConfig) {
        if let Some(ref configuration) = self.configuration {
            config.configuration = configuration.clone();
        }
        if let Some(ref name) = self.registry_name {
            config.registry_name = name.clone();
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if self.permissive {
            config.exit_code_policy = ExitCodePolicy::Permissive;
        }
        if let Some(ref level) = self.log_level {
            config.log_level = level.to_lowercase();
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
