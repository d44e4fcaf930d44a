use crate::nuget::purge_caches;
use crate::pipeline::context::PublishContext;
use crate::pipeline::phase_trait::PublishPhase;
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Removes cached copies of the packages about to be rebuilt
pub struct PurgeCachePhase;

#[async_trait]
impl PublishPhase for PurgeCachePhase {
    async fn execute(&self, context: &mut PublishContext) -> Result<()> {
        let cache_root = context
            .report
            .cache_root
            .clone()
            .context("cache root has not been located")?;

        context.report.purged_caches =
            purge_caches(&cache_root, &context.config.package_projects)?;
        Ok(())
    }
}
