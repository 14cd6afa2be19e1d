//! Pipeline declaration.
//!
//! The user's configuration function receives a [`PipelineBuilder`] and
//! declares zero or more stages synchronously, each as a
//! `source → pipe(transform)… → pipe_into(sink)` chain. Every `source*` call
//! reserves one execution slot in declaration order; execution itself is
//! driven entirely by the runner afterwards.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::pattern::PatternSet;
use crate::pipeline::error::PipelineResult;
use crate::pipeline::sink::StageSink;
use crate::pipeline::source::{BoxFileStream, StageSource};
use crate::pipeline::FileTransform;

pub(crate) struct StageSlot {
    pub(crate) source: StageSource,
    /// Filled in by [`StageChain::pipe_into`]; a slot left unwired is
    /// skipped at run time.
    pub(crate) wiring: Option<StageWiring>,
}

pub(crate) struct StageWiring {
    pub(crate) transforms: Vec<Box<dyn FileTransform>>,
    pub(crate) sink: StageSink,
}

type SharedSlots = Arc<Mutex<Vec<StageSlot>>>;

/// Builder handed to the user's configuration function, once per run.
pub struct PipelineBuilder {
    base_path: PathBuf,
    /// Pattern set used by sources declared without a pattern; the built-in
    /// "any path with an extension" set unless the engine config overrides it.
    default_patterns: PatternSet,
    slots: SharedSlots,
}

impl PipelineBuilder {
    pub(crate) fn new(base_path: PathBuf, default_patterns: PatternSet) -> Self {
        Self {
            base_path,
            default_patterns,
            slots: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Snapshot source over the registry entries matching `patterns`.
    pub fn source<S: AsRef<str>>(&mut self, patterns: &[S]) -> PipelineResult<StageChain> {
        let set = PatternSet::compile(&self.base_path, patterns)?;
        Ok(self.register(StageSource::snapshot(set, false)))
    }

    /// Snapshot source with the default pattern.
    pub fn source_all(&mut self) -> StageChain {
        let set = self.default_patterns.clone();
        self.register(StageSource::snapshot(set, false))
    }

    /// Snapshot source restricted to paths added or changed since the last
    /// run, then filtered by `patterns`.
    pub fn source_modified<S: AsRef<str>>(&mut self, patterns: &[S]) -> PipelineResult<StageChain> {
        let set = PatternSet::compile(&self.base_path, patterns)?;
        Ok(self.register(StageSource::snapshot(set, true)))
    }

    /// Modified-only snapshot source with the default pattern.
    pub fn source_modified_all(&mut self) -> StageChain {
        let set = self.default_patterns.clone();
        self.register(StageSource::snapshot(set, true))
    }

    /// Proxy source wrapping an externally supplied stream, unfiltered.
    /// The stage claims no registry entries, so everything it emits is
    /// appended.
    pub fn source_stream(&mut self, stream: BoxFileStream) -> StageChain {
        self.register(StageSource::proxy(stream))
    }

    /// A fresh ordered collector to terminate a chain with.
    pub fn sink(&self) -> StageSink {
        StageSink::new()
    }

    fn register(&mut self, source: StageSource) -> StageChain {
        let mut slots = self.slots.lock().expect("stage slot lock");
        let index = slots.len();
        slots.push(StageSlot {
            source,
            wiring: None,
        });
        StageChain {
            slots: Arc::clone(&self.slots),
            index,
            transforms: Vec::new(),
        }
    }

    /// Take the declared stages, in declaration order.
    pub(crate) fn into_slots(self) -> Vec<StageSlot> {
        std::mem::take(&mut *self.slots.lock().expect("stage slot lock"))
    }
}

/// A stage under declaration: a source with the transform steps piped onto
/// it so far. Completing the chain with [`pipe_into`](StageChain::pipe_into)
/// wires it back into its reserved slot.
pub struct StageChain {
    slots: SharedSlots,
    index: usize,
    transforms: Vec<Box<dyn FileTransform>>,
}

impl StageChain {
    /// Append a transform step to the chain.
    pub fn pipe<T: FileTransform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Terminate the chain at `sink`, completing this stage's wiring.
    ///
    /// Wiring only takes effect while the declaration phase is still open; a
    /// chain smuggled out of the configuration function and terminated after
    /// the runner has taken the stage queue is ignored with a warning.
    pub fn pipe_into(self, sink: StageSink) {
        let mut slots = self.slots.lock().expect("stage slot lock");
        match slots.get_mut(self.index) {
            Some(slot) => {
                slot.wiring = Some(StageWiring {
                    transforms: self.transforms,
                    sink,
                });
            }
            None => {
                log::warn!(
                    "stage {}: wired after the stage queue was taken; ignoring",
                    self.index
                );
            }
        }
    }
}
