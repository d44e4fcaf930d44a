//! External process invocation
//!
//! Every `dotnet` call made by the pipeline goes through a [`ProcessRunner`].
//! Child output is captured rather than inherited so it never interleaves with
//! our own log lines, and the caller receives the exit status and both streams.

use crate::error::{PublishError, Result};
use async_trait::async_trait;
use std::fmt;
use std::process::Stdio;
use tracing::{debug, warn};

/// A single command-line argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Plain(String),
    /// Wrapped in double quotes on the raw command line where the platform
    /// parses one (Windows); passed through untouched elsewhere.
    Quoted(String),
}

impl Arg {
    pub fn value(&self) -> &str {
        match self {
            Arg::Plain(v) | Arg::Quoted(v) => v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<Arg>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Plain(arg.into()));
        self
    }

    pub fn quoted(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Quoted(arg.into()));
        self
    }

    pub fn arg_values(&self) -> Vec<&str> {
        self.args.iter().map(Arg::value).collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            match arg {
                Arg::Plain(v) => write!(f, " {}", v)?,
                Arg::Quoted(v) => write!(f, " \"{}\"", v)?,
            }
        }
        Ok(())
    }
}

/// Result of a finished child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the child was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Default::default()
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// What to do when an external tool exits with a non-zero status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitCodePolicy {
    /// Abort the pipeline with [`PublishError::ProcessFailed`]
    #[default]
    Strict,
    /// Log a warning and carry on
    Permissive,
}

impl ExitCodePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "permissive" => Some(Self::Permissive),
            _ => None,
        }
    }

    pub fn enforce(&self, invocation: &Invocation, output: &ProcessOutput) -> Result<()> {
        if output.is_success() {
            return Ok(());
        }

        match self {
            ExitCodePolicy::Strict => Err(PublishError::ProcessFailed {
                command: invocation.to_string(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            }),
            ExitCodePolicy::Permissive => {
                warn!(
                    command = %invocation,
                    code = ?output.code,
                    stderr = %output.stderr.trim(),
                    "Command failed; continuing"
                );
                Ok(())
            }
        }
    }
}

impl fmt::Display for ExitCodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCodePolicy::Strict => write!(f, "strict"),
            ExitCodePolicy::Permissive => write!(f, "permissive"),
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the command to completion. Fails only when the child could not be
    /// started; a non-zero exit is reported through [`ProcessOutput::code`].
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        debug!(command = %invocation, "Running");

        let mut command = std::process::Command::new(&invocation.program);
        for arg in &invocation.args {
            match arg {
                Arg::Plain(v) => {
                    command.arg(v);
                }
                Arg::Quoted(v) => push_quoted(&mut command, v),
            }
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Abandoned runs (a sibling failed under `jobs > 1`) must not leave
        // builds writing packages behind us.
        let mut command = tokio::process::Command::from(command);
        command.kill_on_drop(true);

        let output = command
            .output()
            .await
            .map_err(|source| PublishError::ProcessSpawn {
                command: invocation.to_string(),
                source,
            })?;

        let result = ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(command = %invocation, code = ?result.code, "Finished");

        Ok(result)
    }
}

#[cfg(windows)]
fn push_quoted(command: &mut std::process::Command, value: &str) {
    use std::os::windows::process::CommandExt;
    command.raw_arg(format!("\"{}\"", value));
}

#[cfg(not(windows))]
fn push_quoted(command: &mut std::process::Command, value: &str) {
    command.arg(value);
}
