use super::run_invocations;
use crate::config::PublishConfig;
use crate::nuget::find_artifacts;
use crate::pipeline::context::PublishContext;
use crate::pipeline::phase_trait::PublishPhase;
use crate::process::Invocation;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use tracing::warn;

/// Pushes every freshly built package into the local source
pub struct PushPhase;

pub fn push_invocation(config: &PublishConfig, artifact: &Path) -> Invocation {
    Invocation::new(&config.dotnet)
        .arg("nuget")
        .arg("push")
        .arg(artifact.to_string_lossy())
        .arg("-s")
        .arg(&config.registry_name)
}

#[async_trait]
impl PublishPhase for PushPhase {
    async fn execute(&self, context: &mut PublishContext) -> Result<()> {
        let mut artifacts = Vec::new();
        for project in context.package_projects() {
            artifacts.extend(find_artifacts(&project.directory)?);
        }

        if artifacts.is_empty() {
            warn!("No packages found to publish");
        }

        let invocations = artifacts
            .iter()
            .map(|artifact| {
                (
                    format!("Publishing '{}'...", artifact.display()),
                    push_invocation(&context.config, artifact),
                )
            })
            .collect();

        run_invocations(
            &context.runner,
            context.config.exit_code_policy,
            context.config.jobs,
            invocations,
        )
        .await?;

        context.report.published_artifacts = artifacts;
        Ok(())
    }
}
