//! Pipeline scheduling.
//!
//! [`PipelineRunner`] drives one run: it invokes the user's configuration
//! function against a fresh builder, then drains the declared stage queue
//! strictly one stage at a time. Each stage's filtered input set is resolved
//! against the registry *as it stands when the stage starts*, so a later
//! stage observes every mutation synchronization applied for earlier stages,
//! renames included.
//!
//! A run never fails once started. A configuration error aborts it before
//! any stage executes, resolving with the registry untouched; a stage error
//! is logged, that stage's effect is discarded entirely (synchronization is
//! skipped, not applied with empty output, which would wrongly delete files
//! the stage never reached), and the queue advances.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_stream::StreamExt;

use crate::config::EngineConfig;
use crate::pattern::PatternSet;
use crate::pipeline::builder::{PipelineBuilder, StageSlot, StageWiring};
use crate::pipeline::error::PipelineResult;
use crate::pipeline::sink::StageSink;
use crate::pipeline::source::BoxFileStream;
use crate::pipeline::sync;
use crate::pipeline::{FileTransform, ModificationSet, StageFile, StageOutcome};
use crate::registry::FileRegistry;

/// The user's pipeline declaration, invoked synchronously once per run.
pub type PipelineConfig = Arc<dyn Fn(&mut PipelineBuilder) -> PipelineResult<()> + Send + Sync>;

/// Run lifecycle. `Aborted` is terminal and only entered when the
/// configuration function itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running(usize),
    Done,
    Aborted,
}

/// What a run resolved with: the (possibly mutated) registry plus one
/// outcome per declared stage.
#[derive(Debug)]
pub struct RunOutcome {
    pub registry: FileRegistry,
    pub stages: Vec<StageOutcome>,
    pub state: RunState,
}

pub struct PipelineRunner {
    base_path: PathBuf,
    /// Override for the pattern used by sources declared without one;
    /// compiled fresh each run, so an invalid override aborts the run like
    /// any other configuration error.
    default_pattern: Option<String>,
    config: PipelineConfig,
}

impl PipelineRunner {
    pub fn new(base_path: impl Into<PathBuf>, config: PipelineConfig) -> Self {
        Self {
            base_path: base_path.into(),
            default_pattern: None,
            config,
        }
    }

    pub fn from_config(engine: &EngineConfig, config: PipelineConfig) -> Self {
        let mut runner = Self::new(engine.base_path.clone(), config);
        runner.default_pattern = engine.default_pattern.clone();
        runner
    }

    /// Execute one run over `registry` with the given modification set.
    pub async fn run(&self, mut registry: FileRegistry, modified: ModificationSet) -> RunOutcome {
        let mut state = RunState::Idle;
        log::debug!("run starting in state {state:?} ({} modified path(s))", modified.len());

        let default_patterns = match &self.default_pattern {
            Some(pattern) => {
                match PatternSet::compile(&self.base_path, std::slice::from_ref(pattern)) {
                    Ok(set) => set,
                    Err(err) => {
                        log::error!("pipeline configuration failed: {err}");
                        return RunOutcome {
                            registry,
                            stages: Vec::new(),
                            state: RunState::Aborted,
                        };
                    }
                }
            }
            None => PatternSet::default_for(&self.base_path),
        };

        let mut builder = PipelineBuilder::new(self.base_path.clone(), default_patterns);
        if let Err(err) = (self.config)(&mut builder) {
            log::error!("pipeline configuration failed: {err}");
            return RunOutcome {
                registry,
                stages: Vec::new(),
                state: RunState::Aborted,
            };
        }

        let slots = builder.into_slots();
        let mut stages = Vec::with_capacity(slots.len());
        for (index, slot) in slots.into_iter().enumerate() {
            state = RunState::Running(index);
            log::debug!("run state {state:?}");
            let outcome = execute_stage(index, slot, &mut registry, &modified).await;
            log::debug!("stage {index} {outcome}");
            stages.push(outcome);
        }

        state = RunState::Done;
        log::debug!("run state {state:?}");
        RunOutcome {
            registry,
            stages,
            state,
        }
    }
}

async fn execute_stage(
    index: usize,
    slot: StageSlot,
    registry: &mut FileRegistry,
    modified: &ModificationSet,
) -> StageOutcome {
    let Some(wiring) = slot.wiring else {
        log::warn!("stage {index}: source declared without a sink; skipping");
        return StageOutcome::Skipped("no sink attached".to_string());
    };
    let StageWiring {
        mut transforms,
        mut sink,
    } = wiring;

    // Input paths are fixed before any user code sees a file.
    let (input_paths, stream) = slot.source.start(registry, modified);
    log::debug!("stage {index}: {} input file(s)", input_paths.len());

    match drive(stream, &mut transforms, &mut sink).await {
        Ok(()) => {
            let report = sync::synchronize(registry, &input_paths, sink.into_files());
            StageOutcome::Completed {
                replaced: report.replaced,
                removed: report.removed,
                appended: report.appended,
            }
        }
        Err(err) => {
            log::warn!("stage {index} failed, registry left as it was: {err}");
            StageOutcome::Failed(err.to_string())
        }
    }
}

/// Pump every source item through the transform chain into the sink, then
/// cascade each step's flush output through the steps downstream of it.
async fn drive(
    mut stream: BoxFileStream,
    transforms: &mut [Box<dyn FileTransform>],
    sink: &mut StageSink,
) -> PipelineResult<()> {
    while let Some(item) = stream.next().await {
        let file = item?;
        let batch = run_transforms(transforms, 0, vec![file]).await?;
        sink.extend(batch);
    }

    for step in 0..transforms.len() {
        let flushed = transforms[step].flush().await?;
        if flushed.is_empty() {
            continue;
        }
        let batch = run_transforms(transforms, step + 1, flushed).await?;
        sink.extend(batch);
    }

    sink.finish();
    Ok(())
}

async fn run_transforms(
    transforms: &mut [Box<dyn FileTransform>],
    from: usize,
    mut batch: Vec<StageFile>,
) -> PipelineResult<Vec<StageFile>> {
    for transform in transforms[from..].iter_mut() {
        let mut next = Vec::new();
        for file in batch {
            next.extend(transform.transform(file).await?);
        }
        batch = next;
    }
    Ok(batch)
}
