//! Createathon judge - untrusted code execution and grading engine
//!
//! The engine takes a submission (source text plus a language tag), screens
//! it, materializes it into an ephemeral on-disk unit, runs it in a child
//! process under a wall-clock deadline, and either grades the output against
//! a challenge's test cases or hands back the raw run result.
//!
//! Entry points live on [`Judge`]: [`Judge::grade`] for graded submissions
//! and [`Judge::run`] for standalone playground runs.

pub mod config;
pub mod error;
pub mod judger;
pub mod languages;
pub mod playground;
pub mod runner;
pub mod screener;
pub mod source;
pub mod verdict;

// Re-export the types a caller needs for the two entry points.
pub use config::JudgeConfig;
pub use error::AdmissionError;
pub use judger::{Judge, TIME_LIMIT_MESSAGE};
pub use languages::LanguageRegistry;
pub use playground::{RunRequest, RunReply};
pub use verdict::{
    Challenge, GradingResult, ScoreCredit, SubmissionStatus, TestCase, TestCaseVerdict,
};
