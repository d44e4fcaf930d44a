//! Package archives produced by `dotnet build`

use crate::error::{PublishError, Result};
use crate::layout::ProjectDescriptor;
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ARTIFACT_EXTENSION: &str = "nupkg";

/// All `*.nupkg` files below `dir`, sorted. A missing directory yields none.
pub fn find_artifacts(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    // Build output usually sits under gitignored bin/ directories.
    let walker = WalkBuilder::new(dir).standard_filters(false).build();

    let mut artifacts = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let is_artifact = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(ARTIFACT_EXTENSION))
            .unwrap_or(false);

        if is_file && is_artifact {
            artifacts.push(entry.into_path());
        }
    }

    artifacts.sort();
    Ok(artifacts)
}

/// Deletes every artifact under `source_dir/<project>` for each project and
/// returns the deleted paths.
pub fn purge_artifacts<S: AsRef<str>>(
    source_dir: &Path,
    project_names: &[S],
) -> Result<Vec<PathBuf>> {
    let mut deleted = Vec::new();

    for name in project_names {
        let project = ProjectDescriptor::new(source_dir, name.as_ref());
        for artifact in find_artifacts(&project.directory)? {
            info!("Deleting '{}'...", artifact.display());
            match fs::remove_file(&artifact) {
                Ok(()) => deleted.push(artifact),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(PublishError::io(&artifact, e)),
            }
        }
    }

    Ok(deleted)
}

fn walk_error(dir: &Path, err: ignore::Error) -> PublishError {
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
    PublishError::io(dir, source)
}
