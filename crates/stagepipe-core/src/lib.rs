pub mod config;
pub mod host_bridge;
pub mod pattern;
pub mod pipeline;
pub mod registry;

// Re-export key public types for host embedders
pub use config::EngineConfig;
pub use host_bridge::HostBridge;
pub use pattern::PatternSet;
pub use pipeline::{
    FileTransform, MapFiles, ModificationSet, PipelineBuilder, PipelineConfig, PipelineError,
    PipelineResult, PipelineRunner, RunOutcome, RunState, StageChain, StageFile, StageOutcome,
    StageSink,
};
pub use registry::{FileRecord, FileRegistry};
