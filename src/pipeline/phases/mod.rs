// Publish pipeline phases, in execution order. Cleaning finishes before any
// build starts and every build finishes before anything is pushed.

#[path = "01_registry.rs"]
pub mod registry;
#[path = "02_locate_cache.rs"]
pub mod locate_cache;
#[path = "03_purge_cache.rs"]
pub mod purge_cache;
#[path = "04_clean.rs"]
pub mod clean;
#[path = "05_build.rs"]
pub mod build;
#[path = "06_publish.rs"]
pub mod publish;

pub use build::BuildPhase;
pub use clean::CleanArtifactsPhase;
pub use locate_cache::LocateCachePhase;
pub use publish::PushPhase;
pub use purge_cache::PurgeCachePhase;
pub use registry::RegistryPhase;

use crate::error::Result;
use crate::process::{ExitCodePolicy, Invocation, ProcessRunner};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::info;

/// Runs each invocation with at most `jobs` in flight, logging its message as
/// it starts. Stops at the first failure `policy` does not tolerate.
pub(crate) async fn run_invocations(
    runner: &Arc<dyn ProcessRunner>,
    policy: ExitCodePolicy,
    jobs: usize,
    invocations: Vec<(String, Invocation)>,
) -> Result<()> {
    stream::iter(invocations)
        .map(|(message, invocation)| async move {
            info!("{}", message);
            let output = runner.run(&invocation).await?;
            policy.enforce(&invocation, &output)
        })
        .buffered(jobs.max(1))
        .try_collect::<Vec<()>>()
        .await?;
    Ok(())
}
