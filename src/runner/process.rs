//! Process runner implementation
//!
//! Runs the interpreter as a direct child in its own process group, so that
//! the deadline kill reaches anything the interpreter forked. Streams are
//! drained concurrently with a byte cap per stream; the drain continues past
//! the cap so a flooding child can never block on a full pipe.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::{CommandSpec, RunOutcome, RunStatus, Runner};

/// Marker appended to a captured stream that hit its ceiling.
pub const TRUNCATION_MARKER: &str = "\n[output truncated]";

/// Runner backed by direct child processes with piped stdio.
pub struct ProcessRunner {
    max_stdout_bytes: usize,
    max_stderr_bytes: usize,
}

impl ProcessRunner {
    /// Output ceilings are fixed at construction; deadlines vary per call.
    pub fn new(max_stdout_bytes: usize, max_stderr_bytes: usize) -> Self {
        Self {
            max_stdout_bytes,
            max_stderr_bytes,
        }
    }
}

#[async_trait]
impl Runner for ProcessRunner {
    async fn run(&self, cmd: &CommandSpec, deadline_ms: u64, stdin: Option<&str>) -> RunOutcome {
        let started = Instant::now();

        debug!(
            "spawning {} {:?} (deadline {} ms)",
            cmd.program, cmd.args, deadline_ms
        );

        let mut command = Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Own process group, so the deadline kill reaches forked children.
            .process_group(0)
            // Dropping an in-flight run future kills the child with it.
            .kill_on_drop(true);
        if let Some(dir) = &cmd.work_dir {
            command.current_dir(dir);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return RunOutcome::launch_failed(
                    format!("failed to start {}: {}", cmd.program, e),
                    elapsed_ms(started),
                );
            }
        };

        // Feed stdin, then drop the handle so the child sees EOF. A child
        // that exits without reading breaks the pipe; that is its business,
        // not a launch failure.
        if let Some(mut handle) = child.stdin.take() {
            if let Some(input) = stdin {
                if let Err(e) = handle.write_all(input.as_bytes()).await {
                    debug!("stdin write ended early: {}", e);
                }
            }
        }

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let (max_stdout, max_stderr) = (self.max_stdout_bytes, self.max_stderr_bytes);

        let io_and_wait = async {
            let (stdout, stderr) = tokio::join!(
                read_capped(stdout_pipe, max_stdout),
                read_capped(stderr_pipe, max_stderr),
            );
            let status = child.wait().await;
            (status, stdout, stderr)
        };

        let waited = tokio::time::timeout(Duration::from_millis(deadline_ms), io_and_wait).await;

        match waited {
            Ok((Ok(status), stdout, stderr)) => RunOutcome {
                status: RunStatus::Exited(status.code().unwrap_or(-1)),
                stdout: stdout.into_text(),
                stderr: stderr.into_text(),
                time_ms: elapsed_ms(started),
            },
            Ok((Err(e), _, _)) => RunOutcome::launch_failed(
                format!("failed to wait for {}: {}", cmd.program, e),
                elapsed_ms(started),
            ),
            Err(_) => {
                // Deadline hit. Partial output is discarded; the outcome is
                // timed-out, nothing else.
                terminate(&mut child).await;
                RunOutcome {
                    status: RunStatus::TimedOut,
                    stdout: String::new(),
                    stderr: String::new(),
                    time_ms: elapsed_ms(started),
                }
            }
        }
    }
}

/// SIGKILL the child's whole process group and reap it. Signalling a group
/// that has already exited is a no-op, so termination is idempotent.
async fn terminate(child: &mut Child) {
    if let Some(pid) = child.id() {
        match signal::killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => warn!("failed to signal process group {}: {}", pid, e),
        }
    }
    if let Err(e) = child.wait().await {
        warn!("failed to reap killed child: {}", e);
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// A stream captured up to its cap, with the overflow drained and counted.
struct CappedStream {
    captured: Vec<u8>,
    truncated: bool,
}

impl CappedStream {
    fn empty() -> Self {
        Self {
            captured: Vec::new(),
            truncated: false,
        }
    }

    /// Lossy UTF-8 text with the truncation marker appended when capped.
    fn into_text(self) -> String {
        let mut text = String::from_utf8_lossy(&self.captured).into_owned();
        if self.truncated {
            text.push_str(TRUNCATION_MARKER);
        }
        text
    }
}

/// Read a pipe to EOF, keeping at most `cap` bytes.
async fn read_capped<R>(pipe: Option<R>, cap: usize) -> CappedStream
where
    R: AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return CappedStream::empty();
    };

    let mut captured = Vec::new();
    let mut total = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        match pipe.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                total += n;
                if captured.len() < cap {
                    let take = n.min(cap - captured.len());
                    captured.extend_from_slice(&chunk[..take]);
                }
            }
            Err(e) => {
                debug!("stream read ended: {}", e);
                break;
            }
        }
    }

    CappedStream {
        truncated: total > captured.len(),
        captured,
    }
}
