//! File synchronization: the positional merge of a finished stage's output
//! back into the registry.
//!
//! Reconciliation assumes ordinal correspondence, not path matching: input
//! paths are consumed in the order the stage claimed them, outputs in the
//! order the sink collected them, one output per input path. An output takes
//! the served position its input path occupied (a stage may rename freely);
//! a missing output removes the entry; surplus outputs are appended to both
//! lists. Entries outside the input-path set are never touched.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use crate::pipeline::convert;
use crate::pipeline::StageFile;
use crate::registry::FileRegistry;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SyncReport {
    pub(crate) replaced: usize,
    pub(crate) removed: usize,
    pub(crate) appended: usize,
}

pub(crate) fn synchronize(
    registry: &mut FileRegistry,
    input_paths: &[PathBuf],
    output: Vec<StageFile>,
) -> SyncReport {
    let mut output: VecDeque<StageFile> = output.into();
    let mut report = SyncReport::default();

    for path in input_paths {
        let served_idx = registry.find_served(path);
        // Located by path, independently of the served position: served and
        // included are not necessarily index-aligned for a given path.
        let included_idx = registry.find_included(path);

        match output.pop_front() {
            Some(replacement) => {
                log::debug!(
                    "replace {} with {}",
                    path.display(),
                    replacement.path.display()
                );
                let record = Arc::new(convert::to_record(replacement));
                match served_idx {
                    Some(idx) => {
                        registry.served[idx] = Arc::clone(&record);
                        if let Some(idx) = included_idx {
                            registry.included[idx] = record;
                        }
                        report.replaced += 1;
                    }
                    None => {
                        // Input path vanished from the registry mid-run; not
                        // producible through the engine itself, but a host
                        // mutating concurrently could cause it.
                        log::warn!(
                            "input path {} no longer served; appending its replacement",
                            path.display()
                        );
                        registry.served.push(Arc::clone(&record));
                        registry.included.push(record);
                        report.appended += 1;
                    }
                }
            }
            None => {
                log::debug!("remove {}", path.display());
                if let Some(idx) = served_idx {
                    registry.served.remove(idx);
                    report.removed += 1;
                }
                if let Some(idx) = included_idx {
                    registry.included.remove(idx);
                }
            }
        }
    }

    for file in output {
        log::debug!("append {}", file.path.display());
        let record = Arc::new(convert::to_record(file));
        registry.served.push(Arc::clone(&record));
        registry.included.push(record);
        report.appended += 1;
    }

    report
}
