//! Runner module - process execution abstraction
//!
//! The runner launches exactly one child process per call, feeds it stdin,
//! enforces a wall-clock deadline and reports a structured outcome. It does
//! not compare outputs, award points, or know what a test case is; that is
//! the judger's job.

pub mod process;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Command to launch: program, arguments and working directory.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub work_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            work_dir: None,
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(|a| a.into()).collect();
        self
    }

    pub fn with_work_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.work_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Build from a command vector; the first element is the program.
    pub fn from_vec(cmd: &[String]) -> Self {
        let mut iter = cmd.iter();
        let program = iter.next().cloned().unwrap_or_default();
        let args: Vec<String> = iter.cloned().collect();
        Self {
            program,
            args,
            work_dir: None,
        }
    }
}

/// How a run ended, with no verdict interpretation attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Process exited on its own with the given code
    Exited(i32),
    /// Forcibly terminated at the wall-clock deadline
    TimedOut,
    /// The process could not be started or awaited; carries the description
    LaunchFailed(String),
}

impl RunStatus {
    /// Exit code 0 and nothing else counts as success.
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Exited(0))
    }
}

/// Outcome of one run: status, capped streams and elapsed wall time.
#[derive(Debug)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Captured stdout, truncated at the configured ceiling
    pub stdout: String,
    /// Captured stderr, truncated at the configured ceiling
    pub stderr: String,
    /// Wall-clock duration of the run in milliseconds
    pub time_ms: u64,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Exit code from the status (-1 if the process never exited on its own).
    pub fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Exited(code) => code,
            _ => -1,
        }
    }

    /// Outcome for a process that never started.
    pub fn launch_failed(reason: impl Into<String>, time_ms: u64) -> Self {
        Self {
            status: RunStatus::LaunchFailed(reason.into()),
            stdout: String::new(),
            stderr: String::new(),
            time_ms,
        }
    }
}

/// Runner trait for executing one command per call.
///
/// Implementations never return an error: a process that cannot be launched
/// or awaited yields a `LaunchFailed` outcome, so the caller always receives
/// a result to classify.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Run `cmd` with `stdin` fed to the child, enforcing `deadline_ms` as a
    /// hard wall-clock bound.
    async fn run(&self, cmd: &CommandSpec, deadline_ms: u64, stdin: Option<&str>) -> RunOutcome;
}

pub use process::ProcessRunner;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_splits_program_and_args() {
        let cmd = CommandSpec::from_vec(&[
            "python3".to_string(),
            "main.py".to_string(),
            "--flag".to_string(),
        ]);
        assert_eq!(cmd.program, "python3");
        assert_eq!(cmd.args, vec!["main.py", "--flag"]);
        assert!(cmd.work_dir.is_none());
    }

    #[test]
    fn test_builder() {
        let cmd = CommandSpec::new("sh")
            .with_args(["-c", "echo hi"])
            .with_work_dir("/tmp");
        assert_eq!(cmd.program, "sh");
        assert_eq!(cmd.args, vec!["-c", "echo hi"]);
        assert_eq!(cmd.work_dir.as_deref(), Some(Path::new("/tmp")));
    }

    #[test]
    fn test_status_success_only_for_zero_exit() {
        assert!(RunStatus::Exited(0).is_success());
        assert!(!RunStatus::Exited(1).is_success());
        assert!(!RunStatus::TimedOut.is_success());
        assert!(!RunStatus::LaunchFailed("no such file".into()).is_success());
    }

    #[test]
    fn test_exit_code_fallback() {
        let outcome = RunOutcome::launch_failed("spawn failed", 0);
        assert_eq!(outcome.exit_code(), -1);
        assert!(!outcome.is_success());
    }
}
