//! State carried through a publish run

use crate::config::PublishConfig;
use crate::layout::{ProjectDescriptor, WorkingContext};
use crate::nuget::{EnsureOutcome, SourceRegistry};
use crate::process::ProcessRunner;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// What a run did, phase by phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub root_dir: PathBuf,
    pub source_outcome: Option<EnsureOutcome>,
    pub cache_root: Option<PathBuf>,
    pub purged_caches: Vec<PathBuf>,
    pub purged_artifacts: Vec<PathBuf>,
    pub built_projects: Vec<String>,
    pub published_artifacts: Vec<PathBuf>,
}

pub struct PublishContext {
    pub working: WorkingContext,
    pub config: PublishConfig,
    pub runner: Arc<dyn ProcessRunner>,
    pub registry: Arc<dyn SourceRegistry>,
    pub report: PublishReport,
}

impl PublishContext {
    pub fn new(
        working: WorkingContext,
        config: PublishConfig,
        runner: Arc<dyn ProcessRunner>,
        registry: Arc<dyn SourceRegistry>,
    ) -> Self {
        let report = PublishReport {
            root_dir: working.root_dir().to_path_buf(),
            ..Default::default()
        };
        Self {
            working,
            config,
            runner,
            registry,
            report,
        }
    }

    pub fn build_projects(&self) -> Vec<ProjectDescriptor> {
        self.config
            .build_projects
            .iter()
            .map(|name| self.working.project(name))
            .collect()
    }

    pub fn package_projects(&self) -> Vec<ProjectDescriptor> {
        self.config
            .package_projects
            .iter()
            .map(|name| self.working.project(name))
            .collect()
    }
}
