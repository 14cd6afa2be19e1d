//! Stage sink: a pure ordered collector.

use crate::pipeline::StageFile;

/// Collects everything a stage emits, in emission order, and records the
/// single end-of-stage transition. It does not filter, convert, or validate.
#[derive(Debug, Default)]
pub struct StageSink {
    files: Vec<StageFile>,
    finished: bool,
}

impl StageSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extend(&mut self, files: impl IntoIterator<Item = StageFile>) {
        debug_assert!(!self.finished, "sink received files after finish");
        self.files.extend(files);
    }

    /// Mark the sink finished. Called exactly once, after the source and all
    /// transform steps have signalled end-of-sequence.
    pub(crate) fn finish(&mut self) {
        debug_assert!(!self.finished, "sink finished twice");
        self.finished = true;
    }

    pub(crate) fn into_files(self) -> Vec<StageFile> {
        self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
