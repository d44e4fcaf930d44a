use crate::nuget::locate_cache_root;
use crate::pipeline::context::PublishContext;
use crate::pipeline::phase_trait::PublishPhase;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Finds the NuGet global package cache, unless one was configured
pub struct LocateCachePhase;

#[async_trait]
impl PublishPhase for LocateCachePhase {
    async fn execute(&self, context: &mut PublishContext) -> Result<()> {
        let cache_root = match &context.config.cache_root {
            Some(configured) => configured.clone(),
            None => locate_cache_root()?,
        };
        debug!(cache = %cache_root.display(), "NuGet cache root");
        context.report.cache_root = Some(cache_root);
        Ok(())
    }
}
