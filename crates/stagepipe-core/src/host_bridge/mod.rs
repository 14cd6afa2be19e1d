//! # Host Bridge
//!
//! The explicit observer interface the host test runner drives instead of
//! any runtime patching of host internals. The host calls
//! [`on_file_added`](HostBridge::on_file_added) /
//! [`on_file_changed`](HostBridge::on_file_changed) /
//! [`on_file_removed`](HostBridge::on_file_removed) as it learns about
//! registry mutations between runs, and
//! [`on_run_triggered`](HostBridge::on_run_triggered) when a run starts,
//! passing its pending file-list future; the bridge chains onto it and
//! resolves with the transformed registry.

use std::future::Future;
use std::mem;
use std::path::{Path, PathBuf};

use crate::pipeline::runner::PipelineRunner;
use crate::pipeline::ModificationSet;
use crate::registry::FileRegistry;

pub struct HostBridge {
    runner: PipelineRunner,
    added: Vec<PathBuf>,
    changed: Vec<PathBuf>,
}

impl HostBridge {
    pub fn new(runner: PipelineRunner) -> Self {
        Self {
            runner,
            added: Vec::new(),
            changed: Vec::new(),
        }
    }

    pub fn on_file_added(&mut self, path: impl Into<PathBuf>) {
        self.added.push(path.into());
    }

    pub fn on_file_changed(&mut self, path: impl Into<PathBuf>) {
        self.changed.push(path.into());
    }

    /// A removed file no longer qualifies as added or changed.
    pub fn on_file_removed(&mut self, path: &Path) {
        self.added.retain(|p| p != path);
        self.changed.retain(|p| p != path);
    }

    /// Chain onto the host's pending file list: await it, run the pipeline
    /// over it, and resolve with the (possibly mutated) registry. The
    /// added/changed sets accumulated since the previous run are consumed
    /// here, so the next run starts clean. Always resolves; stage failures
    /// are contained by the runner.
    pub async fn on_run_triggered<F>(&mut self, pending: F) -> FileRegistry
    where
        F: Future<Output = FileRegistry>,
    {
        let modified = ModificationSet::from_parts(
            mem::take(&mut self.added),
            mem::take(&mut self.changed),
        );
        let registry = pending.await;
        let outcome = self.runner.run(registry, modified).await;
        for (index, stage) in outcome.stages.iter().enumerate() {
            log::debug!("stage {index}: {stage}");
        }
        outcome.registry
    }
}

#[cfg(test)]
mod tests;
