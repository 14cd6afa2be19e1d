//! Engine configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::pipeline::error::PipelineResult;

/// Settings the host supplies to the engine. Patterns declared by the
/// pipeline configuration are resolved relative to `base_path`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub base_path: PathBuf,
    /// Replaces the built-in "any path with an extension" pattern used by
    /// sources declared without one.
    pub default_pattern: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            default_pattern: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> PipelineResult<Self> {
        Ok(toml::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_path() {
        let config = EngineConfig::from_toml_str("base_path = \"/project\"").unwrap();
        assert_eq!(config.base_path, PathBuf::from("/project"));
        assert_eq!(config.default_pattern, None);
    }

    #[test]
    fn parses_default_pattern_override() {
        let config =
            EngineConfig::from_toml_str("base_path = \"/project\"\ndefault_pattern = \"**/*.js\"")
                .unwrap();
        assert_eq!(config.default_pattern.as_deref(), Some("**/*.js"));
    }

    #[test]
    fn defaults_missing_fields() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(EngineConfig::from_toml_str("base_path = [").is_err());
    }
}
