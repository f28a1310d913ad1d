//! Language configuration for interpreter selection
//!
//! Each supported language maps a tag (plus aliases) to the source file name
//! the materializer writes and the command that runs it. The table comes from
//! TOML; a bundled copy is embedded at compile time and a deployment can
//! point at its own file instead.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Interpreter configuration for one supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSpec {
    /// Canonical tag, e.g. "python"
    pub name: String,
    /// Source file the execution unit is written as, e.g. "main.py"
    pub source_file: String,
    /// Command that runs the source file, e.g. ["python3", "main.py"]
    pub run_command: Vec<String>,
}

/// Raw TOML shape of a language entry
#[derive(Debug, Deserialize)]
struct RawLanguageSpec {
    source_file: String,
    run_command: String,
    #[serde(default)]
    aliases: Vec<String>,
}

/// Lookup table over canonical tags and aliases, case-insensitive.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: HashMap<String, LanguageSpec>,
}

impl LanguageRegistry {
    /// Registry from the table bundled with the crate.
    pub fn bundled() -> anyhow::Result<Self> {
        let content = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/files/languages.toml"));
        Self::from_toml_str(content).context("bundled language table is invalid")
    }

    /// Registry from a TOML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read language table {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid language table {}", path.display()))
    }

    /// Registry from TOML content.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let raw: HashMap<String, RawLanguageSpec> =
            toml::from_str(content).context("failed to parse language table")?;

        let mut languages = HashMap::new();
        for (name, raw) in raw {
            let run_command = into_command(&raw.run_command);
            if run_command.is_empty() {
                anyhow::bail!("empty run_command for language {}", name);
            }

            let spec = LanguageSpec {
                name: name.to_lowercase(),
                source_file: raw.source_file,
                run_command,
            };

            for alias in &raw.aliases {
                languages.insert(alias.to_lowercase(), spec.clone());
            }
            languages.insert(spec.name.clone(), spec);
        }

        Ok(Self { languages })
    }

    /// Look up a language by tag or alias.
    pub fn get(&self, tag: &str) -> Option<&LanguageSpec> {
        self.languages.get(&tag.to_lowercase())
    }

    /// All tags the registry answers to, aliases included.
    pub fn supported_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.languages.keys().cloned().collect();
        tags.sort();
        tags
    }
}

fn into_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(|s| s.to_string()).collect()
}
