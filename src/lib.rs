//! collate-localpublish - local build-and-publish loop for Collate packages
//!
//! Rebuilds the Collate NuGet packages and pushes them into a local,
//! filesystem-backed package source so consumer projects can be tested
//! against the newest build without manual cache juggling.
//!
//! # Pipeline
//!
//! 1. Resolve the repository root from wherever the tool was started
//!    ([`layout::DirectoryResolver`]).
//! 2. Make sure the local package source exists and is enabled
//!    ([`nuget::ensure_source`]).
//! 3. Locate the NuGet cache and purge the packages about to be rebuilt
//!    ([`nuget::locate_cache_root`], [`nuget::purge_caches`]).
//! 4. Delete stale `.nupkg` files ([`nuget::purge_artifacts`]).
//! 5. `dotnet build` each project, then `dotnet nuget push` each fresh package.
//!
//! # Example
//!
//! ```no_run
//! use collate_localpublish::{PublishConfig, PublishOrchestrator};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = PublishConfig::from_env()?;
//! let report = PublishOrchestrator::default()
//!     .run_with_dotnet(Path::new("."), config)
//!     .await?;
//! println!("published {} package(s)", report.published_artifacts.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod collate_config;
pub mod config;
pub mod error;
pub mod layout;
pub mod nuget;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod util;

pub use collate_config::{CollateConfig, CollateConfigError};
pub use config::{ConfigError, PublishConfig};
pub use error::PublishError;
pub use layout::{DirectoryResolver, KnownDir, ProjectDescriptor, WorkingContext};
pub use pipeline::{PublishOrchestrator, PublishReport};
pub use process::{ExitCodePolicy, Invocation, ProcessOutput, ProcessRunner, TokioProcessRunner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
