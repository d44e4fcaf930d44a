//! Run summary formatting

use crate::nuget::EnsureOutcome;
use crate::pipeline::PublishReport;
use anyhow::{Context, Result};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &PublishReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize report")
            }
            OutputFormat::Human => Ok(format_human(report)),
        }
    }
}

fn format_human(report: &PublishReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Root: {}", report.root_dir.display());

    let source = match &report.source_outcome {
        Some(EnsureOutcome::Created(dir)) => format!("created at {}", dir.display()),
        Some(EnsureOutcome::Enabled) => "enabled".to_string(),
        Some(EnsureOutcome::AlreadyEnabled) => "already enabled".to_string(),
        None => "untouched".to_string(),
    };
    let _ = writeln!(out, "Local source: {}", source);

    if let Some(ref cache) = report.cache_root {
        let _ = writeln!(out, "NuGet cache: {}", cache.display());
    }
    let _ = writeln!(out, "Purged cache entries: {}", report.purged_caches.len());
    let _ = writeln!(out, "Deleted stale packages: {}", report.purged_artifacts.len());
    let _ = writeln!(out, "Built: {}", report.built_projects.join(", "));

    if report.published_artifacts.is_empty() {
        let _ = writeln!(out, "Published: nothing");
    } else {
        let _ = writeln!(out, "Published:");
        for artifact in &report.published_artifacts {
            let _ = writeln!(out, "  {}", artifact.display());
        }
    }

    out
}
