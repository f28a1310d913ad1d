//! Playground module - standalone, ungraded execution
//!
//! One request, one process, one reply. Nothing is compared against an
//! expected output here; the caller just gets the program's stdout or a
//! labeled error string.

use serde::{Deserialize, Serialize};

use crate::judger::Judge;
use crate::runner::RunStatus;

/// A standalone execution request.
#[derive(Debug, Clone, Deserialize)]
pub struct RunRequest {
    #[serde(alias = "code")]
    pub source: String,
    pub language: String,
    /// Text fed to the child's stdin, if any.
    #[serde(default, alias = "inputs")]
    pub stdin: Option<String>,
}

/// The reply for a standalone execution.
///
/// `output` carries either the program's stdout or a labeled error message;
/// `error` says which of the two it is.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunReply {
    pub output: String,
    pub error: bool,
}

impl RunReply {
    fn ok(output: String) -> Self {
        Self {
            output,
            error: false,
        }
    }

    fn failed(output: String) -> Self {
        Self {
            output,
            error: true,
        }
    }
}

impl Judge {
    /// Run a submission once, ungraded, under the standalone deadline.
    ///
    /// Rejections and failures never surface as an `Err`; they are folded
    /// into the reply so the caller has a single shape to render.
    pub async fn run(&self, request: &RunRequest) -> RunReply {
        let lang = match self.admit(
            &request.source,
            &request.language,
            request.stdin.as_deref(),
        ) {
            Ok(lang) => lang,
            Err(e) => return RunReply::failed(format!("Submission Rejected:\n{e}")),
        };

        let deadline_ms = self.config().run_timeout_ms;
        let outcome = self
            .run_source(lang, &request.source, request.stdin.as_deref(), deadline_ms)
            .await;

        match outcome.status {
            RunStatus::Exited(0) => RunReply::ok(outcome.stdout),
            RunStatus::Exited(_) => RunReply::failed(format!("Runtime Error:\n{}", outcome.stderr)),
            RunStatus::TimedOut => RunReply::failed(format!(
                "Time Limit Exceeded:\nexecution was stopped after {deadline_ms} ms"
            )),
            RunStatus::LaunchFailed(reason) => {
                RunReply::failed(format!("Execution Error:\n{reason}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JudgeConfig;
    use crate::languages::LanguageRegistry;

    const SHELL_TABLE: &str = r#"
[shell]
source_file = "main.sh"
run_command = "sh main.sh"
"#;

    fn judge_with_deadline(run_timeout_ms: u64) -> Judge {
        let config = JudgeConfig {
            run_timeout_ms,
            ..JudgeConfig::default()
        };
        Judge::new(config, LanguageRegistry::from_toml_str(SHELL_TABLE).unwrap())
    }

    fn request(source: &str, stdin: Option<&str>) -> RunRequest {
        RunRequest {
            source: source.to_string(),
            language: "shell".to_string(),
            stdin: stdin.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_run_returns_stdout_on_success() {
        let judge = judge_with_deadline(2_000);
        let reply = judge.run(&request("echo hello\n", None)).await;

        assert_eq!(
            reply,
            RunReply {
                output: "hello\n".into(),
                error: false,
            }
        );
    }

    #[tokio::test]
    async fn test_run_feeds_stdin_to_the_child() {
        let judge = judge_with_deadline(2_000);
        let reply = judge.run(&request("cat\n", Some("round trip"))).await;

        assert!(!reply.error);
        assert_eq!(reply.output, "round trip");
    }

    #[tokio::test]
    async fn test_run_labels_runtime_errors() {
        let judge = judge_with_deadline(2_000);
        let reply = judge.run(&request("echo broken >&2\nexit 2\n", None)).await;

        assert!(reply.error);
        assert_eq!(reply.output, "Runtime Error:\nbroken\n");
    }

    #[tokio::test]
    async fn test_run_labels_timeouts_with_the_deadline() {
        let judge = judge_with_deadline(400);
        let reply = judge.run(&request("sleep 30\n", None)).await;

        assert!(reply.error);
        assert_eq!(
            reply.output,
            "Time Limit Exceeded:\nexecution was stopped after 400 ms"
        );
    }

    #[tokio::test]
    async fn test_run_labels_rejections() {
        let judge = judge_with_deadline(2_000);
        let reply = judge.run(&request("import socket\n", None)).await;

        assert!(reply.error);
        assert!(reply.output.starts_with("Submission Rejected:\n"));
        assert!(reply.output.contains("import socket"));
    }

    #[tokio::test]
    async fn test_run_rejects_unknown_language() {
        let judge = judge_with_deadline(2_000);
        let mut req = request("echo hi\n", None);
        req.language = "fortran".into();

        let reply = judge.run(&req).await;

        assert!(reply.error);
        assert!(reply.output.starts_with("Submission Rejected:\n"));
        assert!(reply.output.contains("fortran"));
    }

    #[test]
    fn test_request_accepts_store_field_aliases() {
        let req: RunRequest =
            serde_json::from_str(r#"{"code":"echo hi","language":"shell","inputs":"x"}"#).unwrap();

        assert_eq!(req.source, "echo hi");
        assert_eq!(req.stdin.as_deref(), Some("x"));
    }

    #[test]
    fn test_request_stdin_defaults_to_none() {
        let req: RunRequest =
            serde_json::from_str(r#"{"source":"echo hi","language":"shell"}"#).unwrap();

        assert_eq!(req.stdin, None);
    }
}
