//! Judger module - admission, evaluation and grading aggregation
//!
//! The `Judge` owns the screener and runner, runs every test case of a
//! submission sequentially, and folds the per-case verdicts into one
//! `GradingResult`. Admission failures reject a submission before anything
//! touches the filesystem; every later failure is data in a verdict.

use std::time::Instant;

use tracing::info;

use crate::config::JudgeConfig;
use crate::error::AdmissionError;
use crate::languages::{LanguageRegistry, LanguageSpec};
use crate::runner::{CommandSpec, ProcessRunner, RunOutcome, RunStatus, Runner};
use crate::screener::{DenylistScreener, Screener};
use crate::source::SourceUnit;
use crate::verdict::{Challenge, GradingResult, SubmissionStatus, TestCase, TestCaseVerdict};

/// Fixed error text recorded for runs killed at the deadline.
pub const TIME_LIMIT_MESSAGE: &str = "Time limit exceeded";

/// The grading engine. Stateless between invocations; safe to share.
pub struct Judge {
    config: JudgeConfig,
    languages: LanguageRegistry,
    screener: Box<dyn Screener>,
    runner: Box<dyn Runner>,
}

impl Judge {
    /// Judge with the default denylist screener and process runner, both
    /// built from `config`.
    pub fn new(config: JudgeConfig, languages: LanguageRegistry) -> Self {
        let screener = Box::new(DenylistScreener::new(config.denylist.clone()));
        let runner = Box::new(ProcessRunner::new(
            config.max_stdout_bytes,
            config.max_stderr_bytes,
        ));
        Self {
            config,
            languages,
            screener,
            runner,
        }
    }

    /// Swap in another screener implementation.
    pub fn with_screener(mut self, screener: Box<dyn Screener>) -> Self {
        self.screener = screener;
        self
    }

    /// Swap in another runner implementation.
    pub fn with_runner(mut self, runner: Box<dyn Runner>) -> Self {
        self.runner = runner;
        self
    }

    pub(crate) fn config(&self) -> &JudgeConfig {
        &self.config
    }

    /// Grade one submission against a challenge.
    ///
    /// Test cases are evaluated strictly in order, one child process at a
    /// time; case n+1 does not start until case n's execution unit has been
    /// released.
    pub async fn grade(
        &self,
        challenge: &Challenge,
        source: &str,
        language: &str,
    ) -> Result<GradingResult, AdmissionError> {
        let lang = self.admit(
            source,
            language,
            challenge
                .test_cases
                .iter()
                .filter_map(|case| case.input.as_deref()),
        )?;

        let started = Instant::now();

        // An empty case list still yields exactly one verdict.
        let synthetic = [TestCase::default()];
        let cases: &[TestCase] = if challenge.test_cases.is_empty() {
            &synthetic
        } else {
            &challenge.test_cases
        };

        let mut test_results = Vec::with_capacity(cases.len());
        let mut all_passed = true;

        for (idx, case) in cases.iter().enumerate() {
            let verdict = self
                .evaluate_case(lang, source, case, idx + 1, self.config.case_timeout_ms)
                .await;
            all_passed &= verdict.passed;
            test_results.push(verdict);
        }

        let status = if all_passed {
            SubmissionStatus::Completed
        } else {
            SubmissionStatus::Failed
        };
        let points_earned = if all_passed { challenge.points } else { 0 };

        info!(
            "graded submission: challenge={}, language={}, status={}, points={}, cases={}",
            challenge.id,
            lang.name,
            status,
            points_earned,
            test_results.len()
        );

        Ok(GradingResult {
            status,
            points_earned,
            execution_time_ms: started.elapsed().as_millis() as u64,
            test_results,
        })
    }

    /// One test case: materialize, run, release, classify.
    async fn evaluate_case(
        &self,
        lang: &LanguageSpec,
        source: &str,
        case: &TestCase,
        index: usize,
        deadline_ms: u64,
    ) -> TestCaseVerdict {
        let input = case.input.as_deref().unwrap_or("");
        let expected = case.expected_output.as_deref().unwrap_or("");

        let outcome = self
            .run_source(lang, source, case.input.as_deref(), deadline_ms)
            .await;

        let (passed, error) = match outcome.status {
            RunStatus::Exited(0) => {
                // An empty expected output means a clean exit is the check.
                let passed =
                    expected.trim().is_empty() || outputs_match(&outcome.stdout, expected);
                (passed, None)
            }
            RunStatus::Exited(_) => (false, Some(outcome.stderr.clone())),
            RunStatus::TimedOut => (false, Some(TIME_LIMIT_MESSAGE.to_string())),
            RunStatus::LaunchFailed(ref reason) => (false, Some(reason.clone())),
        };

        TestCaseVerdict {
            test_case: index,
            passed,
            input: input.to_string(),
            expected_output: expected.to_string(),
            actual_output: outcome.stdout,
            error,
        }
    }

    /// Materialize the source, run it once, release the unit.
    ///
    /// The release happens after the child has exited or been killed, never
    /// before; a failed materialization surfaces as a launch-failed outcome
    /// with nothing on disk to release.
    pub(crate) async fn run_source(
        &self,
        lang: &LanguageSpec,
        source: &str,
        stdin: Option<&str>,
        deadline_ms: u64,
    ) -> RunOutcome {
        let unit = match SourceUnit::materialize(source, lang) {
            Ok(unit) => unit,
            Err(e) => return RunOutcome::launch_failed(format!("{:#}", e), 0),
        };

        let cmd = CommandSpec::from_vec(&lang.run_command).with_work_dir(unit.work_dir());
        let outcome = self.runner.run(&cmd, deadline_ms, stdin).await;

        unit.release();
        outcome
    }

    /// Size ceilings, screen, language lookup; in that order, all before any
    /// filesystem or process activity.
    pub(crate) fn admit<'s>(
        &self,
        source: &str,
        language: &str,
        inputs: impl IntoIterator<Item = &'s str>,
    ) -> Result<&LanguageSpec, AdmissionError> {
        if source.len() > self.config.max_source_bytes {
            return Err(AdmissionError::SourceTooLarge {
                size: source.len(),
                limit: self.config.max_source_bytes,
            });
        }

        for input in inputs {
            if input.len() > self.config.max_input_bytes {
                return Err(AdmissionError::InputTooLarge {
                    size: input.len(),
                    limit: self.config.max_input_bytes,
                });
            }
        }

        if let Some(pattern) = self.screener.screen(source) {
            return Err(AdmissionError::ForbiddenPattern(pattern));
        }

        self.languages
            .get(language)
            .ok_or_else(|| AdmissionError::UnsupportedLanguage(language.to_string()))
    }
}

/// Compare program output with expected output, ignoring leading and
/// trailing whitespace on both sides.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}
