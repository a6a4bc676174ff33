//! Sandbox configuration, loadable from JSON.

use std::fs;
use std::path::Path;

use selbox_html::Isolation;
use selbox_markup::{DEFAULT_INDENT_SIZE, ScanOptions};
use selbox_select::GeneratorOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration is not valid JSON for [`SandboxConfig`]
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a [`Session`](crate::Session) can be configured with.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Spaces per indent level when formatting.
    pub indent_size: usize,
    /// How markup is rendered relative to the host.
    pub isolation: Isolation,
    /// Ignore tags written inside comments when scanning the source.
    pub skip_comments: bool,
    /// Selector generator settings.
    pub generator: GeneratorOptions,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            indent_size: DEFAULT_INDENT_SIZE,
            isolation: Isolation::default(),
            skip_comments: true,
            generator: GeneratorOptions::default(),
        }
    }
}

impl SandboxConfig {
    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] when the text is not a valid configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Json`] when its content is not a valid configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Scanner options implied by this configuration.
    #[must_use]
    pub const fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            skip_comments: self.skip_comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selbox_select::CandidateKind;

    #[test]
    fn test_empty_object_is_default() {
        let config = SandboxConfig::from_json_str("{}").expect("valid config");
        assert_eq!(config, SandboxConfig::default());
        assert_eq!(config.indent_size, 2);
        assert!(config.scan_options().skip_comments);
    }

    #[test]
    fn test_partial_config() {
        let config = SandboxConfig::from_json_str(
            r#"{"indent_size": 4, "isolation": "isolated", "skip_comments": false,
                "generator": {"selectors": ["id", "nth-child"], "max_candidates": 10}}"#,
        )
        .expect("valid config");
        assert_eq!(config.indent_size, 4);
        assert_eq!(config.isolation, Isolation::Isolated);
        assert_eq!(config.scan_options(), ScanOptions::naive());
        assert_eq!(
            config.generator.selectors,
            vec![CandidateKind::Id, CandidateKind::NthChild]
        );
        assert_eq!(config.generator.max_candidates, 10);
        assert_eq!(config.generator.max_combinations, 3);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            SandboxConfig::from_json_str(r#"{"isolation": "sideways"}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            SandboxConfig::from_json_file("/nonexistent/selbox.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
