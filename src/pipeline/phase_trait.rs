use super::context::PublishContext;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PublishPhase: Send + Sync {
    async fn execute(&self, context: &mut PublishContext) -> Result<()>;
}
