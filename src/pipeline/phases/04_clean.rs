use crate::nuget::purge_artifacts;
use crate::pipeline::context::PublishContext;
use crate::pipeline::phase_trait::PublishPhase;
use anyhow::Result;
use async_trait::async_trait;

/// Deletes stale `.nupkg` files so only fresh builds get published
pub struct CleanArtifactsPhase;

#[async_trait]
impl PublishPhase for CleanArtifactsPhase {
    async fn execute(&self, context: &mut PublishContext) -> Result<()> {
        context.report.purged_artifacts = purge_artifacts(
            context.working.source_dir(),
            &context.config.package_projects,
        )?;
        Ok(())
    }
}
