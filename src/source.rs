//! Execution unit materialization
//!
//! A `SourceUnit` is the ephemeral on-disk home of one submission run: a
//! unique temporary directory holding the source under the language's file
//! name. The unit owns its directory; `release` removes it explicitly and
//! dropping the unit removes it as a backstop, so no exit path can leak it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::languages::LanguageSpec;

/// One materialized submission, alive until released or dropped.
pub struct SourceUnit {
    dir: tempfile::TempDir,
    source_path: PathBuf,
}

impl SourceUnit {
    /// Write `source` into a fresh unique directory as the language's source
    /// file. The directory name is random per call, which is what keeps
    /// concurrent requests from colliding.
    pub fn materialize(source: &str, language: &LanguageSpec) -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to allocate execution unit")?;
        let source_path = dir.path().join(&language.source_file);

        std::fs::write(&source_path, source).with_context(|| {
            format!("failed to write source file {}", source_path.display())
        })?;

        Ok(Self { dir, source_path })
    }

    /// Directory the run command executes in.
    pub fn work_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the materialized source file.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Remove the unit. A removal failure is logged and suppressed so it can
    /// never override the run outcome already computed.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!("failed to remove execution unit {}: {}", path.display(), e);
        }
    }
}
