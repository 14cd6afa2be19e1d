//! Stage sources.
//!
//! A source produces the finite sequence of [`StageFile`]s one stage
//! consumes. The snapshot variant filters the *current* registry by glob
//! pattern and, optionally, by membership in the run's [`ModificationSet`];
//! the proxy variant wraps an externally supplied stream unfiltered. Either
//! way a source starts exactly once: starting consumes it.

use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio_stream::Stream;

use crate::pattern::PatternSet;
use crate::pipeline::convert;
use crate::pipeline::error::PipelineResult;
use crate::pipeline::{ModificationSet, StageFile};
use crate::registry::{FileRecord, FileRegistry};

/// Item stream feeding a stage. Proxy streams may carry per-item errors
/// (e.g. a failed fetch); snapshot streams never do.
pub type BoxFileStream = Pin<Box<dyn Stream<Item = PipelineResult<StageFile>> + Send>>;

pub(crate) enum StageSource {
    Snapshot {
        patterns: PatternSet,
        modified_only: bool,
    },
    Proxy {
        stream: BoxFileStream,
    },
}

impl StageSource {
    pub(crate) fn snapshot(patterns: PatternSet, modified_only: bool) -> Self {
        StageSource::Snapshot {
            patterns,
            modified_only,
        }
    }

    pub(crate) fn proxy(stream: BoxFileStream) -> Self {
        StageSource::Proxy { stream }
    }

    /// Start the source against the current registry snapshot. Returns the
    /// stage's input paths (the registry entries it claims, recorded before
    /// any user code runs) and the item stream. A proxy source claims no
    /// input paths, so its entire output is later treated as additive.
    pub(crate) fn start(
        self,
        registry: &FileRegistry,
        modified: &ModificationSet,
    ) -> (Vec<PathBuf>, BoxFileStream) {
        match self {
            StageSource::Snapshot {
                patterns,
                modified_only,
            } => {
                let matched = if modified_only {
                    let candidates: Vec<Arc<FileRecord>> = registry
                        .served
                        .iter()
                        .filter(|record| modified.contains(&record.path))
                        .cloned()
                        .collect();
                    patterns.filter(&candidates)
                } else {
                    patterns.filter(&registry.served)
                };

                let input_paths: Vec<PathBuf> =
                    matched.iter().map(|record| record.path.clone()).collect();
                // Eager conversion: the sequence is fixed at stage start and
                // unaffected by anything the stage itself does.
                let files: Vec<PipelineResult<StageFile>> = matched
                    .iter()
                    .map(|record| Ok(convert::to_stage_file(record)))
                    .collect();

                (input_paths, Box::pin(tokio_stream::iter(files)))
            }
            StageSource::Proxy { stream } => (Vec::new(), stream),
        }
    }
}
