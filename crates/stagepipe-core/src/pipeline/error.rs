//! Pipeline engine errors.
//!
//! [`PipelineError`] covers the two failure classes the engine distinguishes:
//! configuration errors (fatal to a run, no stages execute) and stage
//! processing errors (contained; the failing stage's effect is discarded and
//! the run continues). Neither class is ever escalated to the caller as a
//! failed run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("pipeline configuration failed: {reason}")]
    ConfigurationFailed { reason: String },

    #[error("transform failed for '{}': {reason}", path.display())]
    TransformFailed { path: PathBuf, reason: String },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for PipelineError {
    fn from(msg: &str) -> Self {
        PipelineError::Other(msg.to_string())
    }
}

impl From<String> for PipelineError {
    fn from(msg: String) -> Self {
        PipelineError::Other(msg)
    }
}

/// Shorthand for Result with the pipeline error type.
pub type PipelineResult<T> = Result<T, PipelineError>;
