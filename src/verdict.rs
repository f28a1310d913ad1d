//! Grading domain types
//!
//! These are the values crossing the engine boundary: challenge inputs on the
//! way in, verdicts and the grading result on the way out. Wire field names
//! match what the submission store persists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall submission status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Completed,
    Failed,
}

impl SubmissionStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmissionStatus::Completed)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Completed => write!(f, "Completed"),
            SubmissionStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// One input/expected-output pair owned by a challenge.
///
/// Both sides are optional: a missing input means the program is run with an
/// empty stdin, a missing expected output means a successful exit alone
/// counts as a pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub expected_output: Option<String>,
}

/// The engine's view of a challenge: its test cases and point value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub test_cases: Vec<TestCase>,
    pub points: u32,
}

/// The store can persist an explicit `test_cases: null`; treat it like a
/// missing or empty list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TestCase>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<TestCase>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseVerdict {
    /// 1-based case index, in challenge order
    pub test_case: usize,
    pub passed: bool,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    /// Diagnostic text for failed runs; `None` for wrong answers and passes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Whole-submission verdict, written once by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingResult {
    pub status: SubmissionStatus,
    pub points_earned: u32,
    pub execution_time_ms: u64,
    pub test_results: Vec<TestCaseVerdict>,
}

impl GradingResult {
    /// The score update this result authorizes, if any.
    ///
    /// Only a completed submission carries credit, so the caller's
    /// `+= points` / completed-set update cannot be applied to a failed one.
    pub fn credit(&self, challenge: &Challenge) -> Option<ScoreCredit> {
        if self.status.is_completed() {
            Some(ScoreCredit {
                challenge_id: challenge.id.clone(),
                points: self.points_earned,
            })
        } else {
            None
        }
    }
}

/// Additive score credit for one completed challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCredit {
    pub challenge_id: String,
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge() -> Challenge {
        Challenge {
            id: "ch-42".into(),
            test_cases: vec![],
            points: 50,
        }
    }

    fn result(status: SubmissionStatus, points_earned: u32) -> GradingResult {
        GradingResult {
            status,
            points_earned,
            execution_time_ms: 12,
            test_results: vec![],
        }
    }

    #[test]
    fn test_status_display_matches_store_values() {
        assert_eq!(SubmissionStatus::Completed.to_string(), "Completed");
        assert_eq!(SubmissionStatus::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_status_serializes_as_store_values() {
        let json = serde_json::to_string(&SubmissionStatus::Completed).unwrap();
        assert_eq!(json, "\"Completed\"");
    }

    #[test]
    fn test_credit_only_when_completed() {
        let completed = result(SubmissionStatus::Completed, 50);
        assert_eq!(
            completed.credit(&challenge()),
            Some(ScoreCredit {
                challenge_id: "ch-42".into(),
                points: 50,
            })
        );

        let failed = result(SubmissionStatus::Failed, 0);
        assert_eq!(failed.credit(&challenge()), None);
    }

    #[test]
    fn test_verdict_serializes_store_field_names() {
        let verdict = TestCaseVerdict {
            test_case: 1,
            passed: true,
            input: "2\n3".into(),
            expected_output: "5".into(),
            actual_output: "5\n".into(),
            error: None,
        };

        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["test_case"], 1);
        assert_eq!(json["passed"], true);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_challenge_tolerates_null_or_missing_test_cases() {
        let with_null: Challenge =
            serde_json::from_str(r#"{"id":"ch-1","test_cases":null,"points":10}"#).unwrap();
        assert!(with_null.test_cases.is_empty());

        let without: Challenge = serde_json::from_str(r#"{"id":"ch-2","points":10}"#).unwrap();
        assert!(without.test_cases.is_empty());
    }

    #[test]
    fn test_test_case_fields_default_to_none() {
        let case: TestCase = serde_json::from_str("{}").unwrap();
        assert!(case.input.is_none());
        assert!(case.expected_output.is_none());
    }
}
