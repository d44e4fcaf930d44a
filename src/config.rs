//! Configuration for the publish loop
//!
//! Defaults describe the Collate repository. Each value can be overridden
//! from the environment, and the command line overrides the environment.
//!
//! # Environment Variables
//!
//! - `COLLATE_DOTNET`: `dotnet` executable - default: "dotnet"
//! - `COLLATE_CONFIGURATION`: build configuration - default: "Release"
//! - `COLLATE_REGISTRY_NAME`: local package source name - default: "CollateLocalSources"
//! - `COLLATE_BUILD_PROJECTS`: comma-separated projects to build
//! - `COLLATE_PACKAGE_PROJECTS`: comma-separated projects whose packages are
//!   purged from the cache, cleaned and published
//! - `COLLATE_NUGET_CACHE`: NuGet cache root, skipping platform detection
//! - `COLLATE_EXIT_CODES`: `strict` or `permissive` - default: "strict"
//! - `COLLATE_JOBS`: concurrent build/publish invocations - default: "1"
//! - `COLLATE_LOG_LEVEL`: logging level - default: "info"

use crate::layout::{TOMAT_COLLATE, TOMAT_COLLATE_NUGET};
use crate::process::ExitCodePolicy;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_DOTNET: &str = "dotnet";
const DEFAULT_CONFIGURATION: &str = "Release";
const DEFAULT_REGISTRY_NAME: &str = "CollateLocalSources";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_JOBS: usize = 1;
const MAX_JOBS: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub dotnet: String,
    pub configuration: String,
    pub registry_name: String,
    pub build_projects: Vec<String>,
    pub package_projects: Vec<String>,
    pub cache_root: Option<PathBuf>,
    pub exit_code_policy: ExitCodePolicy,
    pub jobs: usize,
    pub log_level: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            dotnet: DEFAULT_DOTNET.to_string(),
            configuration: DEFAULT_CONFIGURATION.to_string(),
            registry_name: DEFAULT_REGISTRY_NAME.to_string(),
            build_projects: vec![TOMAT_COLLATE.to_string(), TOMAT_COLLATE_NUGET.to_string()],
            package_projects: vec![TOMAT_COLLATE_NUGET.to_string()],
            cache_root: None,
            exit_code_policy: ExitCodePolicy::Strict,
            jobs: DEFAULT_JOBS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl PublishConfig {
    /// Defaults overlaid with `COLLATE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = non_empty_var("COLLATE_DOTNET") {
            config.dotnet = v;
        }
        if let Some(v) = non_empty_var("COLLATE_CONFIGURATION") {
            config.configuration = v;
        }
        if let Some(v) = non_empty_var("COLLATE_REGISTRY_NAME") {
            config.registry_name = v;
        }
        if let Some(v) = non_empty_var("COLLATE_BUILD_PROJECTS") {
            config.build_projects = split_list(&v);
        }
        if let Some(v) = non_empty_var("COLLATE_PACKAGE_PROJECTS") {
            config.package_projects = split_list(&v);
        }
        if let Some(v) = non_empty_var("COLLATE_NUGET_CACHE") {
            config.cache_root = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty_var("COLLATE_EXIT_CODES") {
            config.exit_code_policy =
                ExitCodePolicy::parse(&v).ok_or_else(|| ConfigError::ParseError {
                    field: "COLLATE_EXIT_CODES".to_string(),
                    error: format!("expected 'strict' or 'permissive', got '{}'", v),
                })?;
        }
        if let Some(v) = non_empty_var("COLLATE_JOBS") {
            config.jobs = v.trim().parse::<usize>().map_err(|e| ConfigError::ParseError {
                field: "COLLATE_JOBS".to_string(),
                error: e.to_string(),
            })?;
        }
        if let Some(v) = non_empty_var("COLLATE_LOG_LEVEL") {
            config.log_level = v.to_lowercase();
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("dotnet", &self.dotnet),
            ("configuration", &self.configuration),
            ("registry_name", &self.registry_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        if self.build_projects.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "At least one project must be built".to_string(),
            ));
        }
        if self
            .build_projects
            .iter()
            .chain(&self.package_projects)
            .any(|p| p.trim().is_empty())
        {
            return Err(ConfigError::ValidationFailed(
                "Project names must not be empty".to_string(),
            ));
        }

        if self.jobs == 0 {
            return Err(ConfigError::ValidationFailed("Jobs must be at least 1".to_string()));
        }
        if self.jobs > MAX_JOBS {
            return Err(ConfigError::ValidationFailed(format!(
                "Jobs cannot exceed {}",
                MAX_JOBS
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

impl fmt::Display for PublishConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Publish Configuration:")?;
        writeln!(f, "  dotnet: {}", self.dotnet)?;
        writeln!(f, "  Configuration: {}", self.configuration)?;
        writeln!(f, "  Registry: {}", self.registry_name)?;
        writeln!(f, "  Build Projects: {}", self.build_projects.join(", "))?;
        writeln!(f, "  Package Projects: {}", self.package_projects.join(", "))?;
        if let Some(ref dir) = self.cache_root {
            writeln!(f, "  Cache Root: {}", dir.display())?;
        }
        writeln!(f, "  Exit Codes: {}", self.exit_code_policy)?;
        writeln!(f, "  Jobs: {}", self.jobs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
