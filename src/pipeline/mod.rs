pub mod context;
pub mod orchestrator;
pub mod phase_trait;
pub mod phases;

pub use context::{PublishContext, PublishReport};
pub use orchestrator::PublishOrchestrator;
pub use phase_trait::PublishPhase;
