use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::host_bridge::HostBridge;
use crate::pipeline::runner::{PipelineConfig, PipelineRunner};
use crate::pipeline::{FileTransform, PipelineResult, StageFile};
use crate::registry::{FileRecord, FileRegistry};

struct AppendText(&'static str);

#[async_trait]
impl FileTransform for AppendText {
    async fn transform(&mut self, mut file: StageFile) -> PipelineResult<Vec<StageFile>> {
        let mut text = file.text().map(|t| t.into_owned()).unwrap_or_default();
        text.push_str(self.0);
        file.set_text(text);
        Ok(vec![file])
    }
}

// A pipeline that only touches files reported modified since the last run.
fn modified_append_config() -> PipelineConfig {
    Arc::new(|builder| {
        let sink = builder.sink();
        builder
            .source_modified_all()
            .pipe(AppendText(" touched"))
            .pipe_into(sink);
        Ok(())
    })
}

fn bridge() -> HostBridge {
    HostBridge::new(PipelineRunner::new("/base", modified_append_config()))
}

fn registry() -> FileRegistry {
    FileRegistry::shared(vec![
        FileRecord::with_content("/base/a.js", "alpha"),
        FileRecord::with_content("/base/b.js", "beta"),
    ])
}

fn text_of(registry: &FileRegistry, index: usize) -> &str {
    registry.served[index].content.as_deref().unwrap_or_default()
}

#[tokio::test]
async fn run_consumes_the_accumulated_modification_set() {
    let mut bridge = bridge();
    bridge.on_file_changed("/base/a.js");

    let first = bridge.on_run_triggered(async { registry() }).await;
    assert_eq!(text_of(&first, 0), "alpha touched");
    assert_eq!(text_of(&first, 1), "beta");

    // Nothing was reported between runs, so the second run sees no
    // modified files and leaves the registry alone.
    let second = bridge.on_run_triggered(async move { first }).await;
    assert_eq!(text_of(&second, 0), "alpha touched");
    assert_eq!(text_of(&second, 1), "beta");
}

#[tokio::test]
async fn added_and_changed_paths_both_qualify() {
    let mut bridge = bridge();
    bridge.on_file_added("/base/a.js");
    bridge.on_file_changed("/base/b.js");

    let result = bridge.on_run_triggered(async { registry() }).await;

    assert_eq!(text_of(&result, 0), "alpha touched");
    assert_eq!(text_of(&result, 1), "beta touched");
}

#[tokio::test]
async fn removal_retracts_pending_notifications() {
    let mut bridge = bridge();
    bridge.on_file_added("/base/a.js");
    bridge.on_file_changed("/base/b.js");
    bridge.on_file_removed(Path::new("/base/a.js"));
    bridge.on_file_removed(Path::new("/base/b.js"));

    let result = bridge.on_run_triggered(async { registry() }).await;

    assert_eq!(text_of(&result, 0), "alpha");
    assert_eq!(text_of(&result, 1), "beta");
}

#[tokio::test]
async fn resolves_with_the_same_registry_instance_when_untouched() {
    let mut bridge = bridge();
    let reg = registry();
    let before = reg.clone();

    let result = bridge.on_run_triggered(async move { reg }).await;

    for (after, original) in result.served.iter().zip(&before.served) {
        assert!(Arc::ptr_eq(after, original));
    }
}
