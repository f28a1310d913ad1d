//! Admission error taxonomy
//!
//! Everything here rejects a submission before any process is spawned.
//! Later failures (launch, runtime, timeout) are not errors at the engine
//! boundary; they surface as outcomes and verdicts instead.

use thiserror::Error;

/// A submission rejected at admission, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("source exceeds the {limit} byte ceiling ({size} bytes)")]
    SourceTooLarge { size: usize, limit: usize },

    #[error("input exceeds the {limit} byte ceiling ({size} bytes)")]
    InputTooLarge { size: usize, limit: usize },

    #[error("source contains a forbidden pattern: {0}")]
    ForbiddenPattern(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_reason() {
        let err = AdmissionError::ForbiddenPattern("import os".into());
        assert_eq!(
            err.to_string(),
            "source contains a forbidden pattern: import os"
        );

        let err = AdmissionError::UnsupportedLanguage("cobol".into());
        assert_eq!(err.to_string(), "unsupported language: cobol");
    }

    #[test]
    fn test_display_names_both_sizes() {
        let err = AdmissionError::SourceTooLarge {
            size: 20_000,
            limit: 10_240,
        };
        let text = err.to_string();
        assert!(text.contains("20000"));
        assert!(text.contains("10240"));
    }
}
