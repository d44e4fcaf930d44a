//! NuGet-facing operations: cache discovery and purging, package artifacts,
//! and the local package source.

pub mod artifacts;
pub mod cache;
pub mod source;

pub use artifacts::{find_artifacts, purge_artifacts, ARTIFACT_EXTENSION};
pub use cache::{locate_cache_root, locate_cache_root_for, purge_caches, HostOs};
pub use source::{
    ensure_source, parse_source_list, sanitize_source_path, DotnetSourceRegistry, EnsureOutcome,
    MockSourceRegistry, RegistrySource, SourceRegistry,
};
