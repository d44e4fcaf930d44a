//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, error, info};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { root_dir } => {
                info!(root = %root_dir.display(), "Starting local publish");
            }
            ProgressEvent::PhaseStarted { phase } => {
                debug!(phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                info!(
                    phase = %phase,
                    duration_ms = duration.as_millis(),
                    "Phase complete"
                );
            }
            ProgressEvent::Completed {
                published,
                total_time,
            } => {
                info!(
                    published,
                    total_time_ms = total_time.as_millis(),
                    "Local publish complete"
                );
            }
            ProgressEvent::Failed { phase, error } => {
                error!(phase = %phase, error = %error, "Local publish failed");
            }
        }
    }
}
