//! NuGet global package cache

use crate::error::{PublishError, Result};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const UNIX_CACHE_DIR_NAME: &str = "NuGetPackages";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    /// Linux and the BSD family
    Unix,
    Other(String),
}

impl HostOs {
    pub fn current() -> Self {
        Self::from_os_name(env::consts::OS)
    }

    /// Classifies a `std::env::consts::OS` value.
    pub fn from_os_name(name: &str) -> Self {
        match name {
            "windows" => HostOs::Windows,
            "macos" => HostOs::MacOs,
            "linux" | "freebsd" | "netbsd" | "openbsd" | "dragonfly" | "solaris" | "illumos"
            | "android" => HostOs::Unix,
            other => HostOs::Other(other.to_string()),
        }
    }
}

/// Cache root for the current host, read from the process environment.
pub fn locate_cache_root() -> Result<PathBuf> {
    locate_cache_root_for(&HostOs::current(), |key| env::var(key).ok(), dirs::home_dir)
}

/// Cache root for `os`, with environment and user-profile lookups supplied by
/// the caller.
pub fn locate_cache_root_for<V, H>(os: &HostOs, var: V, user_profile: H) -> Result<PathBuf>
where
    V: Fn(&str) -> Option<String>,
    H: FnOnce() -> Option<PathBuf>,
{
    let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());

    match os {
        HostOs::Windows => user_profile()
            .map(|profile| profile.join(".nuget").join("packages"))
            .ok_or_else(|| {
                PublishError::not_found("%USERPROFILE%", "user profile directory is unknown")
            }),
        HostOs::MacOs | HostOs::Unix => {
            if let Some(xdg) = non_empty("XDG_CACHE_HOME") {
                return Ok(PathBuf::from(xdg).join(UNIX_CACHE_DIR_NAME));
            }
            if let Some(home) = non_empty("HOME") {
                return Ok(PathBuf::from(home).join(".cache").join(UNIX_CACHE_DIR_NAME));
            }
            Err(PublishError::PlatformUnsupported(format!(
                "{:?} without XDG_CACHE_HOME or HOME",
                os
            )))
        }
        HostOs::Other(name) => Err(PublishError::PlatformUnsupported(name.clone())),
    }
}

/// Deletes the cache directories of `package_ids` under `cache_root`.
///
/// Directory names are compared case-insensitively. A missing cache root is
/// not an error. Returns the directories that were removed.
pub fn purge_caches<S: AsRef<str>>(
    cache_root: &Path,
    package_ids: &[S],
) -> Result<Vec<PathBuf>> {
    let wanted: Vec<String> = package_ids
        .iter()
        .map(|id| id.as_ref().to_lowercase())
        .collect();

    if !cache_root.is_dir() {
        debug!(cache = %cache_root.display(), "Cache root does not exist; nothing to purge");
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(cache_root).map_err(|e| PublishError::io(cache_root, e))?;
    let mut deleted = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| PublishError::io(cache_root, e))?;
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !wanted.contains(&name) {
            continue;
        }

        let path = entry.path();
        info!("Deleting '{}'...", path.display());
        match fs::remove_dir_all(&path) {
            Ok(()) => deleted.push(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(PublishError::io(&path, e)),
        }
    }

    deleted.sort();
    Ok(deleted)
}
