//! # Stage Pipeline
//!
//! The core engine: user-declared transform stages are recorded in
//! declaration order by [`PipelineBuilder`], executed strictly one at a time
//! by [`PipelineRunner`], and each finished stage's output is merged back
//! into the host registry by the synchronizer before the next stage starts,
//! so later stages observe earlier stages' mutations.

pub mod builder;
pub mod convert;
pub mod error;
pub mod runner;
pub mod sink;
pub mod source;
pub mod sync;

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;

// Re-export important types
pub use builder::{PipelineBuilder, StageChain};
pub use error::{PipelineError, PipelineResult};
pub use runner::{PipelineConfig, PipelineRunner, RunOutcome, RunState};
pub use sink::StageSink;
pub use source::BoxFileStream;

/// A file flowing through a stage: path, optional content buffer, and the
/// modification time carried over from the originating registry record.
#[derive(Debug, Clone, PartialEq)]
pub struct StageFile {
    pub path: PathBuf,
    pub contents: Option<Vec<u8>>,
    pub mtime: SystemTime,
}

impl StageFile {
    pub fn new(path: impl Into<PathBuf>, contents: Option<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents,
            mtime: SystemTime::now(),
        }
    }

    /// Content as text, if any.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.contents.as_deref().map(String::from_utf8_lossy)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.contents = Some(text.into().into_bytes());
    }
}

/// One step of a stage's transform chain.
///
/// A step receives files in emission order and may rename, rewrite, drop
/// (return an empty vec), or fan out (return several files) each one.
/// [`flush`](FileTransform::flush) runs once after the upstream sequence
/// ends and may emit trailing files, which flow through the remaining steps
/// of the chain.
#[async_trait]
pub trait FileTransform: Send {
    async fn transform(&mut self, file: StageFile) -> PipelineResult<Vec<StageFile>>;

    async fn flush(&mut self) -> PipelineResult<Vec<StageFile>> {
        Ok(Vec::new())
    }
}

/// Lifts a plain 1:1 closure into a [`FileTransform`].
pub struct MapFiles<F>(pub F);

#[async_trait]
impl<F> FileTransform for MapFiles<F>
where
    F: FnMut(StageFile) -> PipelineResult<StageFile> + Send,
{
    async fn transform(&mut self, file: StageFile) -> PipelineResult<Vec<StageFile>> {
        Ok(vec![(self.0)(file)?])
    }
}

/// The per-run union of paths the host reported added or changed since the
/// previous run. An empty set means no file qualifies as modified; there is
/// no "first run" special case.
#[derive(Debug, Default, Clone)]
pub struct ModificationSet {
    paths: HashSet<PathBuf>,
}

impl ModificationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        added: impl IntoIterator<Item = PathBuf>,
        changed: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        let paths = added.into_iter().chain(changed).collect();
        Self { paths }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

/// Result of one stage's execution within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Stage finished and its output was reconciled into the registry.
    Completed {
        replaced: usize,
        removed: usize,
        appended: usize,
    },
    /// Stage raised an error; its effect on the registry was discarded.
    Failed(String),
    /// Stage was not executed.
    Skipped(String),
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::Completed {
                replaced,
                removed,
                appended,
            } => write!(
                f,
                "completed ({replaced} replaced, {removed} removed, {appended} appended)"
            ),
            StageOutcome::Failed(reason) => write!(f, "failed: {reason}"),
            StageOutcome::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests;
