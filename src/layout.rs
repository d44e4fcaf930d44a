//! Repository layout: finding the root directory and the projects under it
//!
//! The tool may be started from the repository root, from `src/`, from a
//! project directory or from a build output directory such as
//! `src/<Project>/bin/Release/net6.0`. Rather than searching upward for a
//! `.git` directory (absent when the repository was downloaded as an archive),
//! the starting directory's name is looked up in a fixed table that says how
//! many levels to ascend.

use crate::error::{PublishError, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const REPOSITORY_DIR_NAME: &str = "collate";
pub const SOURCE_DIR_NAME: &str = "src";
pub const REGISTRY_DIR_NAME: &str = "nuget";
pub const PROJECT_EXTENSION: &str = "csproj";
pub const ROOT_MARKER: &str = "publish.sh";

pub const TOMAT_COLLATE: &str = "Tomat.Collate";
pub const TOMAT_COLLATE_NUGET: &str = "Tomat.Collate.NuGet";
pub const TOMAT_COLLATE_LOCALPUBLISH: &str = "Tomat.Collate.LocalPublish";

pub const KNOWN_PROJECTS: &[&str] = &[
    TOMAT_COLLATE,
    TOMAT_COLLATE_NUGET,
    TOMAT_COLLATE_LOCALPUBLISH,
];
pub const KNOWN_FRAMEWORKS: &[&str] = &["netstandard2.0", "net6.0", "net7.0"];

/// Kind of directory recognised by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownDir {
    RepositoryRoot,
    SolutionRoot,
    Project,
    /// `src/<Project>/bin/<Configuration>/<framework>`
    TargetFramework,
}

impl KnownDir {
    pub fn levels_to_root(self) -> usize {
        match self {
            KnownDir::RepositoryRoot => 0,
            KnownDir::SolutionRoot => 1,
            KnownDir::Project => 2,
            KnownDir::TargetFramework => 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    names: Vec<(String, KnownDir)>,
    markers: Vec<String>,
}

impl DirectoryResolver {
    /// A resolver that knows no names and no markers
    pub fn empty() -> Self {
        Self {
            names: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>, kind: KnownDir) -> Self {
        self.names.push((name.into(), kind));
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn classify(&self, dir_name: &str) -> Option<KnownDir> {
        self.names
            .iter()
            .find(|(name, _)| name == dir_name)
            .map(|(_, kind)| *kind)
    }

    /// Maps `start` to the repository root.
    pub fn normalize(&self, start: &Path) -> Result<PathBuf> {
        if !start.exists() {
            return Err(PublishError::not_found(start, "directory does not exist"));
        }
        if !start.is_dir() {
            return Err(PublishError::NotADirectory(start.to_path_buf()));
        }

        let start = if start.is_absolute() {
            start.to_path_buf()
        } else {
            let cwd = env::current_dir().map_err(|e| PublishError::io(start, e))?;
            cwd.join(start)
        };

        let dir_name = start.file_name().and_then(|n| n.to_str());
        if let Some(kind) = dir_name.and_then(|n| self.classify(n)) {
            let levels = kind.levels_to_root();
            debug!(dir = %start.display(), ?kind, levels, "Recognised directory name");
            return start
                .ancestors()
                .nth(levels)
                .map(Path::to_path_buf)
                .ok_or_else(|| {
                    PublishError::not_found(&start, format!("cannot ascend {} levels", levels))
                });
        }

        if self.has_marker(&start)? {
            debug!(dir = %start.display(), "Found root marker");
            return Ok(start);
        }

        Err(PublishError::not_found(
            &start,
            "not detected as the root directory and could not be predictably traversed",
        ))
    }

    fn has_marker(&self, dir: &Path) -> Result<bool> {
        let entries = fs::read_dir(dir).map_err(|e| PublishError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| PublishError::io(dir, e))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let name = entry.file_name();
            if is_file && self.markers.iter().any(|m| name.to_str() == Some(m.as_str())) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Default for DirectoryResolver {
    fn default() -> Self {
        let mut resolver = Self::empty()
            .with_name(REPOSITORY_DIR_NAME, KnownDir::RepositoryRoot)
            .with_name(SOURCE_DIR_NAME, KnownDir::SolutionRoot)
            .with_marker(ROOT_MARKER);
        for project in KNOWN_PROJECTS {
            resolver = resolver.with_name(*project, KnownDir::Project);
        }
        for framework in KNOWN_FRAMEWORKS {
            resolver = resolver.with_name(*framework, KnownDir::TargetFramework);
        }
        resolver
    }
}

/// Resolved root and solution directories, fixed for the whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingContext {
    root_dir: PathBuf,
    source_dir: PathBuf,
}

impl WorkingContext {
    /// Fails unless `root_dir/src` is an existing directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Result<Self> {
        let root_dir = root_dir.into();
        let source_dir = root_dir.join(SOURCE_DIR_NAME);
        if !source_dir.is_dir() {
            return Err(PublishError::not_found(
                &source_dir,
                "root directory has no source directory",
            ));
        }
        Ok(Self {
            root_dir,
            source_dir,
        })
    }

    pub fn resolve(resolver: &DirectoryResolver, start: &Path) -> Result<Self> {
        Self::new(resolver.normalize(start)?)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn project(&self, name: &str) -> ProjectDescriptor {
        ProjectDescriptor::new(&self.source_dir, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub name: String,
    pub directory: PathBuf,
    pub project_file: PathBuf,
}

impl ProjectDescriptor {
    /// `source_dir/<name>/<name>.csproj`
    pub fn new(source_dir: &Path, name: &str) -> Self {
        let directory = source_dir.join(name);
        let project_file = directory.join(format!("{}.{}", name, PROJECT_EXTENSION));
        Self {
            name: name.to_string(),
            directory,
            project_file,
        }
    }
}
