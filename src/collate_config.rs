//! Collate configuration document
//!
//! Build tasks read a JSON file whose `plugins` object maps a plugin assembly
//! name to that plugin's settings:
//!
//! ```json
//! { "plugins": { "Tomat.Collate.Example": { "enabled": true } } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type PluginSettings = HashMap<String, Value>;

#[derive(Debug, Error)]
pub enum CollateConfigError {
    #[error("Collate config path not specified; specify it with the 'CollateConfigPath' property.")]
    PathNotSpecified,

    #[error("Collate config path '{0}' does not exist.")]
    NotFound(PathBuf),

    #[error("Collate config path '{0}' is invalid -- returned null.")]
    Invalid(PathBuf),

    #[error("Failed to read collate config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse collate config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollateConfig {
    /// Keyed by plugin assembly name, compared case-insensitively
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<HashMap<String, PluginSettings>>,
}

impl CollateConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, CollateConfigError> {
        let path = match path {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => return Err(CollateConfigError::PathNotSpecified),
        };

        if !path.is_file() {
            return Err(CollateConfigError::NotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path).map_err(|source| CollateConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&text, path)
    }

    fn from_json(text: &str, path: &Path) -> Result<Self, CollateConfigError> {
        let parsed: Option<Self> =
            serde_json::from_str(text).map_err(|source| CollateConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        parsed.ok_or_else(|| CollateConfigError::Invalid(path.to_path_buf()))
    }

    pub fn plugin_settings(&self, assembly_name: &str) -> Option<&PluginSettings> {
        self.plugins.as_ref()?.iter().find_map(|(name, settings)| {
            name.eq_ignore_ascii_case(assembly_name).then_some(settings)
        })
    }
}
