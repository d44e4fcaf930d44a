use crate::nuget::ensure_source;
use crate::pipeline::context::PublishContext;
use crate::pipeline::phase_trait::PublishPhase;
use anyhow::Result;
use async_trait::async_trait;

/// Registers (or enables) the local package source
pub struct RegistryPhase;

#[async_trait]
impl PublishPhase for RegistryPhase {
    async fn execute(&self, context: &mut PublishContext) -> Result<()> {
        let outcome = ensure_source(
            context.registry.as_ref(),
            context.working.root_dir(),
            &context.config.registry_name,
        )
        .await?;
        context.report.source_outcome = Some(outcome);
        Ok(())
    }
}
