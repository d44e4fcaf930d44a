use super::context::{PublishContext, PublishReport};
use super::phase_trait::PublishPhase;
use super::phases::{
    BuildPhase, CleanArtifactsPhase, LocateCachePhase, PurgeCachePhase, PushPhase, RegistryPhase,
};
use crate::config::PublishConfig;
use crate::layout::{DirectoryResolver, WorkingContext};
use crate::nuget::{DotnetSourceRegistry, SourceRegistry};
use crate::process::{ProcessRunner, TokioProcessRunner};
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct PublishOrchestrator {
    resolver: DirectoryResolver,
    progress_handler: Option<Box<dyn ProgressHandler>>,
}

impl PublishOrchestrator {
    pub fn new(progress_handler: Option<Box<dyn ProgressHandler>>) -> Self {
        Self {
            resolver: DirectoryResolver::default(),
            progress_handler,
        }
    }

    pub fn with_resolver(mut self, resolver: DirectoryResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Runs against the real `dotnet` CLI.
    pub async fn run_with_dotnet(
        &self,
        start_dir: &Path,
        config: PublishConfig,
    ) -> Result<PublishReport> {
        let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner);
        let registry: Arc<dyn SourceRegistry> =
            Arc::new(DotnetSourceRegistry::new(config.dotnet.clone(), runner.clone()));
        self.execute(start_dir, config, runner, registry).await
    }

    pub async fn execute(
        &self,
        start_dir: &Path,
        config: PublishConfig,
        runner: Arc<dyn ProcessRunner>,
        registry: Arc<dyn SourceRegistry>,
    ) -> Result<PublishReport> {
        let start = Instant::now();
        config.validate()?;

        let working = WorkingContext::resolve(&self.resolver, start_dir)
            .with_context(|| format!("Failed to resolve root from {}", start_dir.display()))?;
        info!("cwd: {}", working.root_dir().display());
        info!("srcDir: {}", working.source_dir().display());

        self.emit(&ProgressEvent::Started {
            root_dir: working.root_dir().to_path_buf(),
        });

        let mut context = PublishContext::new(working, config, runner, registry);

        let phases: Vec<(Box<dyn PublishPhase>, &str)> = vec![
            (Box::new(RegistryPhase), "RegistryPhase"),
            (Box::new(LocateCachePhase), "LocateCachePhase"),
            (Box::new(PurgeCachePhase), "PurgeCachePhase"),
            (Box::new(CleanArtifactsPhase), "CleanArtifactsPhase"),
            (Box::new(BuildPhase), "BuildPhase"),
            (Box::new(PushPhase), "PushPhase"),
        ];

        for (phase, phase_name) in phases {
            self.emit(&ProgressEvent::PhaseStarted {
                phase: phase_name.to_string(),
            });

            let phase_start = Instant::now();
            if let Err(e) = phase.execute(&mut context).await {
                self.emit(&ProgressEvent::Failed {
                    phase: phase_name.to_string(),
                    error: format!("{:#}", e),
                });
                return Err(e.context(format!("Phase {} failed", phase_name)));
            }

            self.emit(&ProgressEvent::PhaseComplete {
                phase: phase_name.to_string(),
                duration: phase_start.elapsed(),
            });
            debug!("Phase {} complete", phase_name);
        }

        self.emit(&ProgressEvent::Completed {
            published: context.report.published_artifacts.len(),
            total_time: start.elapsed(),
        });

        Ok(context.report)
    }

    fn emit(&self, event: &ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(event);
        }
    }
}

impl Default for PublishOrchestrator {
    fn default() -> Self {
        Self::new(Some(Box::new(LoggingHandler)))
    }
}
