//! Local NuGet package source registration
//!
//! The package source list lives in the user's NuGet configuration, outside
//! this process. [`SourceRegistry`] is the capability we need from it (list,
//! add, enable); [`DotnetSourceRegistry`] drives it through the `dotnet nuget`
//! CLI and [`MockSourceRegistry`] keeps it in memory.

use crate::error::{PublishError, Result};
use crate::layout::REGISTRY_DIR_NAME;
use crate::process::{ExitCodePolicy, Invocation, ProcessRunner};
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrySource {
    pub name: String,
    /// Directory path or feed URL
    pub location: String,
    pub enabled: bool,
}

#[async_trait]
pub trait SourceRegistry: Send + Sync {
    async fn list(&self) -> Result<Vec<RegistrySource>>;

    async fn add(&self, source: &RegistrySource) -> Result<()>;

    async fn enable(&self, name: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EnsureOutcome {
    Created(PathBuf),
    Enabled,
    AlreadyEnabled,
}

/// Makes sure a source called `name` exists and is enabled.
///
/// A missing source is registered against `root_dir/nuget`, which is created
/// if needed. Names are matched case-sensitively.
pub async fn ensure_source(
    registry: &dyn SourceRegistry,
    root_dir: &Path,
    name: &str,
) -> Result<EnsureOutcome> {
    let sources = registry.list().await?;

    match sources.iter().find(|s| s.name == name) {
        None => {
            info!("NuGet repository '{}' does not exist. Creating...", name);

            let dir = root_dir.join(REGISTRY_DIR_NAME);
            if dir.exists() && !dir.is_dir() {
                return Err(PublishError::io(
                    &dir,
                    io::Error::new(io::ErrorKind::AlreadyExists, "a file occupies this path"),
                ));
            }
            fs::create_dir_all(&dir).map_err(|e| PublishError::io(&dir, e))?;

            registry
                .add(&RegistrySource {
                    name: name.to_string(),
                    location: dir.to_string_lossy().into_owned(),
                    enabled: true,
                })
                .await?;
            Ok(EnsureOutcome::Created(dir))
        }
        Some(source) if !source.enabled => {
            info!(
                "NuGet repository '{}' exists but is not enabled. Enabling...",
                name
            );
            registry.enable(name).await?;
            Ok(EnsureOutcome::Enabled)
        }
        Some(_) => {
            info!("NuGet repository '{}' exists and is already enabled!", name);
            Ok(EnsureOutcome::AlreadyEnabled)
        }
    }
}

/// Doubles a single trailing backslash.
///
/// Inside a quoted Windows argument `"C:\repo\"` the final `\"` reads as an
/// escaped quote, swallowing the closing delimiter.
pub fn sanitize_source_path(path: &str) -> String {
    if path.ends_with("\\\\") || !path.ends_with('\\') {
        path.to_string()
    } else {
        format!("{}\\", path)
    }
}

/// Parses `dotnet nuget list source --format Detailed` output:
///
/// ```text
/// Registered Sources:
///   1.  nuget.org [Enabled]
///       https://api.nuget.org/v3/index.json
/// ```
pub fn parse_source_list(output: &str) -> Vec<RegistrySource> {
    let header_re = Regex::new(r"^\s*\d+\.\s+(.+?)\s+\[([^\]]+)\]\s*$").expect("valid regex");

    let mut sources = Vec::new();
    let mut lines = output.lines().peekable();

    while let Some(line) = lines.next() {
        let Some(caps) = header_re.captures(line) else {
            continue;
        };

        let location = lines
            .next_if(|next| !next.trim().is_empty() && !header_re.is_match(next))
            .map(|next| next.trim().to_string())
            .unwrap_or_default();

        sources.push(RegistrySource {
            name: caps[1].to_string(),
            location,
            enabled: caps[2].trim().eq_ignore_ascii_case("enabled"),
        });
    }

    sources
}

/// Source registry backed by `dotnet nuget`.
///
/// Every call is held to [`ExitCodePolicy::Strict`] whatever the run's policy.
pub struct DotnetSourceRegistry {
    dotnet: String,
    runner: Arc<dyn ProcessRunner>,
}

impl DotnetSourceRegistry {
    pub fn new(dotnet: impl Into<String>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            dotnet: dotnet.into(),
            runner,
        }
    }

    fn nuget(&self) -> Invocation {
        Invocation::new(&self.dotnet).arg("nuget")
    }
}

#[async_trait]
impl SourceRegistry for DotnetSourceRegistry {
    async fn list(&self) -> Result<Vec<RegistrySource>> {
        let invocation = self
            .nuget()
            .arg("list")
            .arg("source")
            .arg("--format")
            .arg("Detailed");
        let output = self.runner.run(&invocation).await?;

        // Without a readable list we cannot tell whether the source exists.
        if !output.is_success() {
            return Err(PublishError::SourceList(format!(
                "'{}' exited with {:?}: {}",
                invocation,
                output.code,
                output.stderr.trim()
            )));
        }

        Ok(parse_source_list(&output.stdout))
    }

    async fn add(&self, source: &RegistrySource) -> Result<()> {
        let invocation = self
            .nuget()
            .arg("add")
            .arg("source")
            .quoted(sanitize_source_path(&source.location))
            .arg("--name")
            .quoted(&source.name);
        let output = self.runner.run(&invocation).await?;
        ExitCodePolicy::Strict.enforce(&invocation, &output)
    }

    async fn enable(&self, name: &str) -> Result<()> {
        let invocation = self.nuget().arg("enable").arg("source").quoted(name);
        let output = self.runner.run(&invocation).await?;
        ExitCodePolicy::Strict.enforce(&invocation, &output)
    }
}

/// In-memory source list
#[derive(Debug, Default)]
pub struct MockSourceRegistry {
    sources: RwLock<Vec<RegistrySource>>,
}

impl MockSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, name: &str, location: &str, enabled: bool) -> Self {
        if let Ok(sources) = self.sources.get_mut() {
            sources.push(RegistrySource {
                name: name.to_string(),
                location: location.to_string(),
                enabled,
            });
        }
        self
    }

    pub fn sources(&self) -> Vec<RegistrySource> {
        self.sources.read().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SourceRegistry for MockSourceRegistry {
    async fn list(&self) -> Result<Vec<RegistrySource>> {
        Ok(self.sources())
    }

    async fn add(&self, source: &RegistrySource) -> Result<()> {
        if let Ok(mut sources) = self.sources.write() {
            sources.push(source.clone());
        }
        Ok(())
    }

    async fn enable(&self, name: &str) -> Result<()> {
        let found = self
            .sources
            .write()
            .ok()
            .and_then(|mut sources| {
                sources
                    .iter_mut()
                    .find(|s| s.name == name)
                    .map(|source| source.enabled = true)
            })
            .is_some();

        if found {
            Ok(())
        } else {
            Err(PublishError::SourceList(format!("no source named '{}'", name)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessOutput;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const LIST_OUTPUT: &str = "Registered Sources:\n\
        \n\
        \x20 1.  nuget.org [Enabled]\n\
        \x20     https://api.nuget.org/v3/index.json\n\
        \x20 2.  CollateLocalSources [Disabled]\n\
        \x20     /home/u/collate/nuget\n";

    struct ScriptedRunner {
        calls: Mutex<Vec<Invocation>>,
        output: ProcessOutput,
    }

    impl ScriptedRunner {
        fn new(output: ProcessOutput) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                output,
            })
        }
    }

    #[async_trait]
    impl ProcessRunner for ScriptedRunner {
        async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(self.output.clone())
        }
    }

    /// Answers `list` with no sources and hands everything else to `inner`
    struct ListThenFail {
        inner: Arc<ScriptedRunner>,
    }

    #[async_trait]
    impl ProcessRunner for ListThenFail {
        async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
            if invocation.arg_values().get(1) == Some(&"list") {
                return Ok(ProcessOutput::success());
            }
            self.inner.run(invocation).await
        }
    }

    #[test]
    fn test_sanitize_source_path() {
        assert_eq!(sanitize_source_path("C:\\repo\\nuget"), "C:\\repo\\nuget");
        assert_eq!(sanitize_source_path("C:\\repo\\nuget\\"), "C:\\repo\\nuget\\\\");
        assert_eq!(sanitize_source_path("C:\\repo\\nuget\\\\"), "C:\\repo\\nuget\\\\");
        assert_eq!(sanitize_source_path("/repo/nuget"), "/repo/nuget");
    }

    #[test]
    fn test_parse_source_list() {
        let sources = parse_source_list(LIST_OUTPUT);
        assert_eq!(
            sources,
            vec![
                RegistrySource {
                    name: "nuget.org".to_string(),
                    location: "https://api.nuget.org/v3/index.json".to_string(),
                    enabled: true,
                },
                RegistrySource {
                    name: "CollateLocalSources".to_string(),
                    location: "/home/u/collate/nuget".to_string(),
                    enabled: false,
                },
            ]
        );
    }

    #[test]
    fn test_parse_empty_source_list() {
        assert!(parse_source_list("No sources found.\n").is_empty());
        assert!(parse_source_list("").is_empty());
    }

    #[test]
    fn test_parse_name_with_spaces() {
        let sources = parse_source_list("  1.  My Local Feed [Enabled]\n      /feed\n");
        assert_eq!(sources[0].name, "My Local Feed");
        assert_eq!(sources[0].location, "/feed");
    }

    #[tokio::test]
    async fn test_ensure_creates_missing_source() {
        let temp = TempDir::new().unwrap();
        let registry = MockSourceRegistry::new();

        let outcome = ensure_source(&registry, temp.path(), "Local").await.unwrap();

        let dir = temp.path().join("nuget");
        assert_eq!(outcome, EnsureOutcome::Created(dir.clone()));
        assert!(dir.is_dir());
        assert_eq!(
            registry.sources(),
            vec![RegistrySource {
                name: "Local".to_string(),
                location: dir.to_string_lossy().into_owned(),
                enabled: true,
            }]
        );
    }

    #[tokio::test]
    async fn test_ensure_enables_disabled_source() {
        let temp = TempDir::new().unwrap();
        let registry = MockSourceRegistry::new().with_source("Local", "/feed", false);

        let outcome = ensure_source(&registry, temp.path(), "Local").await.unwrap();

        assert_eq!(outcome, EnsureOutcome::Enabled);
        assert!(registry.sources()[0].enabled);
        assert!(!temp.path().join("nuget").exists());
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let registry = MockSourceRegistry::new();

        ensure_source(&registry, temp.path(), "Local").await.unwrap();
        let first = registry.sources();
        let outcome = ensure_source(&registry, temp.path(), "Local").await.unwrap();

        assert_eq!(outcome, EnsureOutcome::AlreadyEnabled);
        assert_eq!(registry.sources(), first);
        assert_eq!(registry.sources().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_matches_name_case_sensitively() {
        let temp = TempDir::new().unwrap();
        let registry = MockSourceRegistry::new().with_source("local", "/feed", true);

        let outcome = ensure_source(&registry, temp.path(), "Local").await.unwrap();

        assert!(matches!(outcome, EnsureOutcome::Created(_)));
        assert_eq!(registry.sources().len(), 2);
    }

    #[tokio::test]
    async fn test_ensure_rejects_file_in_place_of_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("nuget"), "").unwrap();
        let registry = MockSourceRegistry::new();

        let err = ensure_source(&registry, temp.path(), "Local").await.unwrap_err();

        assert!(matches!(err, PublishError::Io { .. }));
        assert!(registry.sources().is_empty());
    }

    #[tokio::test]
    async fn test_dotnet_list_parses_output() {
        let runner = ScriptedRunner::new(ProcessOutput {
            code: Some(0),
            stdout: LIST_OUTPUT.to_string(),
            stderr: String::new(),
        });
        let registry = DotnetSourceRegistry::new("dotnet", runner.clone());

        let sources = registry.list().await.unwrap();

        assert_eq!(sources.len(), 2);
        let calls = runner.calls.lock().unwrap();
        assert_eq!(
            calls[0].arg_values(),
            vec!["nuget", "list", "source", "--format", "Detailed"]
        );
    }

    #[tokio::test]
    async fn test_dotnet_list_failure_is_error() {
        let runner = ScriptedRunner::new(ProcessOutput::failure(1, "no sdk"));
        let registry = DotnetSourceRegistry::new("dotnet", runner);

        let err = registry.list().await.unwrap_err();
        assert!(matches!(err, PublishError::SourceList(_)));
    }

    #[tokio::test]
    async fn test_dotnet_add_quotes_and_sanitizes() {
        let runner = ScriptedRunner::new(ProcessOutput::success());
        let registry = DotnetSourceRegistry::new("dotnet", runner.clone());

        registry
            .add(&RegistrySource {
                name: "Local".to_string(),
                location: "C:\\repo\\nuget\\".to_string(),
                enabled: true,
            })
            .await
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(
            calls[0].to_string(),
            "dotnet nuget add source \"C:\\repo\\nuget\\\\\" --name \"Local\""
        );
    }

    #[tokio::test]
    async fn test_dotnet_enable_failure_is_error() {
        let runner = ScriptedRunner::new(ProcessOutput::failure(1, "denied"));
        let registry = DotnetSourceRegistry::new("dotnet", runner.clone());

        assert!(matches!(
            registry.enable("Local").await.unwrap_err(),
            PublishError::ProcessFailed { .. }
        ));

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].arg_values(), vec!["nuget", "enable", "source", "Local"]);
    }

    #[tokio::test]
    async fn test_ensure_fails_when_dotnet_add_fails() {
        let temp = TempDir::new().unwrap();
        // Empty listing, then `add` exits 1.
        let runner = ScriptedRunner::new(ProcessOutput::failure(1, "access denied"));
        let runner = Arc::new(ListThenFail { inner: runner });
        let registry = DotnetSourceRegistry::new("dotnet", runner.clone());

        let err = ensure_source(&registry, temp.path(), "Local").await.unwrap_err();

        assert!(matches!(err, PublishError::ProcessFailed { code: Some(1), .. }));
        let calls = runner.inner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arg_values()[..3], ["nuget", "add", "source"]);
    }
}
