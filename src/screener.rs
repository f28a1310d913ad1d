//! Source screening before execution
//!
//! The screener is an admission filter, not a security boundary: substring
//! denylisting is trivially bypassable by encoding or aliasing. It sits
//! behind a trait so a stricter gate (container, seccomp) can replace it
//! without touching evaluation.

use tracing::debug;

/// Admission filter over submitted source text.
pub trait Screener: Send + Sync {
    /// Returns the offending pattern if the source is rejected, `None` if it
    /// may proceed to execution.
    fn screen(&self, source: &str) -> Option<String>;
}

/// Case-insensitive substring matcher over a fixed pattern list.
///
/// Rejects on the first configured pattern found anywhere in the source.
pub struct DenylistScreener {
    patterns: Vec<String>,
}

impl DenylistScreener {
    /// Patterns are lowercased once here; `screen` lowercases the source per
    /// call.
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .collect(),
        }
    }
}

impl Screener for DenylistScreener {
    fn screen(&self, source: &str) -> Option<String> {
        let haystack = source.to_lowercase();
        let hit = self
            .patterns
            .iter()
            .find(|pattern| haystack.contains(pattern.as_str()))
            .cloned();

        if let Some(ref pattern) = hit {
            debug!("source rejected by screen: pattern {:?}", pattern);
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screener() -> DenylistScreener {
        DenylistScreener::new(["import os", "eval(", "child_process"])
    }

    #[test]
    fn test_clean_source_passes() {
        let source = "a = int(input())\nb = int(input())\nprint(a + b)\n";
        assert_eq!(screener().screen(source), None);
    }

    #[test]
    fn test_rejects_on_match() {
        let source = "import os\nos.listdir('/')\n";
        assert_eq!(screener().screen(source), Some("import os".to_string()));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(
            screener().screen("IMPORT OS\n"),
            Some("import os".to_string())
        );
        assert_eq!(
            screener().screen("result = EVAL(payload)"),
            Some("eval(".to_string())
        );
    }

    #[test]
    fn test_reports_first_configured_match() {
        // Both patterns occur; the earlier entry in the list wins.
        let source = "eval(x)\nimport os\n";
        assert_eq!(screener().screen(source), Some("import os".to_string()));
    }

    #[test]
    fn test_substring_match_inside_longer_token() {
        let source = "const cp = require('child_process');";
        assert_eq!(
            screener().screen(source),
            Some("child_process".to_string())
        );
    }

    #[test]
    fn test_empty_denylist_allows_everything() {
        let screener = DenylistScreener::new(Vec::<String>::new());
        assert_eq!(screener.screen("import os"), None);
    }
}
