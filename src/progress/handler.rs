//! Progress handler trait and events

use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while the publish pipeline runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Root directory resolved, pipeline about to start
    Started { root_dir: PathBuf },

    PhaseStarted { phase: String },

    PhaseComplete { phase: String, duration: Duration },

    /// All phases finished
    Completed {
        published: usize,
        total_time: Duration,
    },

    Failed { phase: String, error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
