//! Engine configuration
//!
//! All limits the engine enforces live in one explicit value that is passed
//! to the judge at construction. Nothing here is global; two judges with
//! different configurations can coexist in one process.

use std::str::FromStr;

/// Default pattern denylist applied to submitted source text.
///
/// Matching is case-insensitive substring search, so these are deliberately
/// conservative: patterns must not collide with ordinary solutions that read
/// stdin and print to stdout.
pub const DEFAULT_DENYLIST: &[&str] = &[
    // host filesystem access
    "import os",
    "import shutil",
    "open(",
    "require('fs'",
    "require(\"fs\"",
    // process control and spawning
    "import sys",
    "import subprocess",
    "child_process",
    "process.exit",
    // network access
    "import socket",
    "import urllib",
    "import requests",
    "require('net'",
    "require(\"net\"",
    "require('http'",
    "require(\"http\"",
    "fetch(",
    // dynamic evaluation
    "eval(",
    "exec(",
    "__import__",
    "new function(",
    // interaction outside the provided stdin pipe
    "prompt(",
];

/// Limits, deadlines and the denylist, fixed at process start.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Submitted source ceiling in bytes
    pub max_source_bytes: usize,
    /// Per-run stdin ceiling in bytes
    pub max_input_bytes: usize,
    /// Captured stdout ceiling in bytes
    pub max_stdout_bytes: usize,
    /// Captured stderr ceiling in bytes
    pub max_stderr_bytes: usize,
    /// Wall-clock deadline for standalone runs in milliseconds
    pub run_timeout_ms: u64,
    /// Wall-clock deadline per graded test case in milliseconds
    pub case_timeout_ms: u64,
    /// Forbidden source patterns, matched case-insensitively
    pub denylist: Vec<String>,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            max_source_bytes: 10 * 1024,
            max_input_bytes: 1024,
            max_stdout_bytes: 5 * 1024,
            max_stderr_bytes: 2 * 1024,
            run_timeout_ms: 10_000,
            case_timeout_ms: 5_000,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl JudgeConfig {
    /// Build a configuration from `JUDGE_*` environment variables, falling
    /// back to the defaults for anything unset or unparsable.
    ///
    /// `JUDGE_DENYLIST` is a comma-separated pattern list that replaces the
    /// default denylist entirely when present.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let denylist = match std::env::var("JUDGE_DENYLIST") {
            Ok(raw) => raw
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            Err(_) => defaults.denylist,
        };

        Self {
            max_source_bytes: env_or("JUDGE_MAX_SOURCE_BYTES", defaults.max_source_bytes),
            max_input_bytes: env_or("JUDGE_MAX_INPUT_BYTES", defaults.max_input_bytes),
            max_stdout_bytes: env_or("JUDGE_MAX_STDOUT_BYTES", defaults.max_stdout_bytes),
            max_stderr_bytes: env_or("JUDGE_MAX_STDERR_BYTES", defaults.max_stderr_bytes),
            run_timeout_ms: env_or("JUDGE_RUN_TIMEOUT_MS", defaults.run_timeout_ms),
            case_timeout_ms: env_or("JUDGE_CASE_TIMEOUT_MS", defaults.case_timeout_ms),
            denylist,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
