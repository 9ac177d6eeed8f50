//! Execution backend boundary.
//!
//! testsync never compiles or runs test data itself. Each generated unit hands its file path to an
//! [`ExecutionBackend`] and reports whatever [`Outcome`] comes back, unmodified.
//!
//! ## Implementations
//!
//! - [`CommandBackend`] runs an external command per file (used by `testsync run`).
//! - Any `Fn(&Path) -> Outcome + Sync` closure or function is a backend, which is what generated
//!   suites usually point at.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use thiserror::Error;

/// Result of running one test-data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    /// The file ran and the backend judged it a failure.
    Failed(String),
    /// The backend could not run the file at all.
    Error(String),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

/// Runs a single test-data file.
///
/// Implementations must be `Sync`: units of one suite may be executed from several threads.
pub trait ExecutionBackend: Sync {
    fn execute(&self, path: &Path) -> Outcome;
}

impl<F> ExecutionBackend for F
where
    F: Fn(&Path) -> Outcome + Sync,
{
    fn execute(&self, path: &Path) -> Outcome {
        self(path)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("backend command is empty")]
    EmptyCommand,
}

/// Placeholder substituted with the test-data path in command arguments.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Runs `program args...` once per file; exit status 0 is a pass.
///
/// `{path}` in any argument is replaced by the file path. Without a placeholder, the path is
/// appended as the last argument.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandBackend {
    pub fn new(command: &[String]) -> Result<Self, BackendError> {
        let (program, args) = command.split_first().ok_or(BackendError::EmptyCommand)?;
        if program.trim().is_empty() {
            return Err(BackendError::EmptyCommand);
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            working_dir: None,
        })
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Arguments for one invocation.
    pub fn args_for(&self, path: &Path) -> Vec<String> {
        let path = path.to_string_lossy();
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(PATH_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(PATH_PLACEHOLDER, &path)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(path.into_owned());
        }
        args
    }
}

impl ExecutionBackend for CommandBackend {
    #[tracing::instrument(skip_all, fields(program = %self.program, path = %path.display()))]
    fn execute(&self, path: &Path) -> Outcome {
        let mut command = Command::new(&self.program);
        command.args(self.args_for(path));
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => return Outcome::Error(format!("failed to run '{}': {}", self.program, e)),
        };

        if output.status.success() {
            return Outcome::Passed;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let status = match output.status.code() {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        tracing::debug!(%status, "backend reported failure");
        Outcome::Failed(format!("{} ({})\n{}{}", self.program, status, stdout, stderr))
    }
}
