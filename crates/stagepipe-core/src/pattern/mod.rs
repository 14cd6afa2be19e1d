//! Glob pattern matching against registry paths.
//!
//! Patterns are resolved relative to a configured base directory before
//! compilation, so `subdir/*.js` under base `/project` matches
//! `/project/subdir/file.js`. Absolute patterns pass through unresolved.

use std::path::Path;
use std::sync::Arc;

use glob::{MatchOptions, Pattern};

use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::registry::FileRecord;

/// Matches any path carrying a dot-extension, at any depth under the base.
pub const DEFAULT_PATTERN: &str = "**/*.*";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    // `*` must not cross directory boundaries; `**` still does.
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// An ordered union of compiled glob patterns, resolved against a base
/// directory. A pure matcher; holds no state about what it has matched.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile `patterns` relative to `base`.
    pub fn compile<S: AsRef<str>>(base: &Path, patterns: &[S]) -> PipelineResult<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            compiled.push(resolve(base, pattern.as_ref())?);
        }
        Ok(Self { patterns: compiled })
    }

    /// The default "any path with an extension" set for `base`.
    pub fn default_for(base: &Path) -> Self {
        let pattern = resolve(base, DEFAULT_PATTERN)
            .expect("default glob pattern is valid against an escaped base");
        Self { patterns: vec![pattern] }
    }

    /// Whether `path` matches at least one pattern in the set.
    pub fn matches(&self, path: &Path) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(path, MATCH_OPTIONS))
    }

    /// Filter `candidates` down to the records whose path matches the set,
    /// preserving the candidates' relative order. Each candidate is
    /// considered once, so overlapping patterns cannot introduce duplicates.
    pub fn filter(&self, candidates: &[Arc<FileRecord>]) -> Vec<Arc<FileRecord>> {
        candidates
            .iter()
            .filter(|record| self.matches(&record.path))
            .cloned()
            .collect()
    }
}

/// Join a pattern onto the base directory and compile it. The base itself is
/// escaped so glob metacharacters in directory names stay literal; a pattern
/// that is already absolute replaces the base entirely.
fn resolve(base: &Path, pattern: &str) -> PipelineResult<Pattern> {
    let escaped_base = Pattern::escape(&base.to_string_lossy());
    let resolved = Path::new(&escaped_base).join(pattern);
    Pattern::new(&resolved.to_string_lossy()).map_err(|source| PipelineError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
