use async_trait::async_trait;
use collate_localpublish::error::Result;
use collate_localpublish::{Invocation, ProcessOutput, ProcessRunner};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn get_collate_localpublish_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.join(format!("collate-localpublish{}", std::env::consts::EXE_SUFFIX))
}

/// A `collate/src/<project>/<project>.csproj` tree inside a temp dir.
#[allow(dead_code)]
pub struct CollateRepo {
    pub temp: TempDir,
    pub root: PathBuf,
}

#[allow(dead_code)]
impl CollateRepo {
    pub fn new(projects: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("collate");
        for project in projects {
            let dir = root.join("src").join(project);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("{}.csproj", project)), "<Project />").unwrap();
        }
        fs::create_dir_all(root.join("src")).unwrap();
        Self { temp, root }
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.source_dir().join(project)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.temp.path().join("cache")
    }

    pub fn write_stale_package(&self, project: &str, file_name: &str) -> PathBuf {
        let dir = self.project_dir(project).join("bin").join("Release");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file_name);
        fs::write(&path, b"stale").unwrap();
        path
    }
}

/// Stands in for the `dotnet` CLI.
///
/// `build` drops `<Project>.1.0.0.nupkg` next to the project and `push` is
/// recorded. Commands with an argument ending in `fail_on` exit with code 1.
///
/// Each call yields to the executor before finishing so concurrent callers
/// really overlap; the peak overlap of builds is recorded.
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeDotnet {
    calls: Mutex<Vec<Vec<String>>>,
    stale_at_build: Mutex<Vec<PathBuf>>,
    fail_on: Option<String>,
    builds_running: AtomicUsize,
    peak_builds: AtomicUsize,
    pushed_during_build: AtomicBool,
}

#[allow(dead_code)]
impl FakeDotnet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn verbs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|args| args.first().cloned().unwrap_or_default())
            .collect()
    }

    /// Highest number of builds that were running at the same time.
    pub fn peak_concurrent_builds(&self) -> usize {
        self.peak_builds.load(Ordering::SeqCst)
    }

    /// Whether a push started while any build was still running.
    pub fn pushed_during_build(&self) -> bool {
        self.pushed_during_build.load(Ordering::SeqCst)
    }

    /// Packages that were already on disk when a build started.
    pub fn stale_at_build(&self) -> Vec<PathBuf> {
        self.stale_at_build.lock().unwrap().clone()
    }

    fn build(&self, project_file: &Path) {
        let dir = project_file.parent().unwrap();
        let name = project_file.file_stem().unwrap().to_string_lossy();

        let stale: Vec<PathBuf> = collate_localpublish::nuget::find_artifacts(dir).unwrap();
        self.stale_at_build.lock().unwrap().extend(stale);

        let output = dir.join("bin").join("Release");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join(format!("{}.1.0.0.nupkg", name)), b"package").unwrap();
    }
}

#[async_trait]
impl ProcessRunner for FakeDotnet {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let args: Vec<String> = invocation
            .arg_values()
            .into_iter()
            .map(String::from)
            .collect();
        self.calls.lock().unwrap().push(args.clone());

        let is_build = args.first().map(String::as_str) == Some("build");
        let is_push = args.get(1).map(String::as_str) == Some("push");

        if is_push && self.builds_running.load(Ordering::SeqCst) > 0 {
            self.pushed_during_build.store(true, Ordering::SeqCst);
        }
        if is_build {
            let running = self.builds_running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_builds.fetch_max(running, Ordering::SeqCst);
        }

        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        let failed = self
            .fail_on
            .as_ref()
            .map(|pattern| args.iter().any(|a| a.ends_with(pattern.as_str())))
            .unwrap_or(false);

        if is_build && !failed {
            self.build(Path::new(&args[1]));
        }
        if is_build {
            self.builds_running.fetch_sub(1, Ordering::SeqCst);
        }

        if failed {
            let pattern = self.fail_on.as_deref().unwrap_or_default();
            return Ok(ProcessOutput::failure(1, format!("{} failed", pattern)));
        }
        Ok(ProcessOutput::success())
    }
}
