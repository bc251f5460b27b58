//! Generator configuration.
//!
//! A batch is described by a [`GeneratorConfig`], built from defaults, an
//! optional `trellis.toml` file, and command-line overrides.
//!
//! ## Examples
//!
//! ```toml
//! inputs = ["src/schema.rs"]
//! output = "src/generated"
//! runtime_crate = "trellis"
//! aggregate_file = "adapters.rs"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::GeneratorError;

/// Default name of the configuration file looked up by the CLI.
pub const CONFIG_FILE: &str = "trellis.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GeneratorConfig {
    /// Source files containing schema traits, in batch order.
    pub inputs: Vec<PathBuf>,
    /// Directory receiving the adapter files and the aggregate.
    pub output: PathBuf,
    /// Path generated code uses to reach the runtime crate.
    pub runtime_crate: String,
    /// File name of the aggregate inside `output`.
    pub aggregate_file: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from("src/generated"),
            runtime_crate: "trellis".to_string(),
            aggregate_file: "adapters.rs".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Loads a configuration file. Relative input and output paths are
    /// resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, GeneratorError> {
        let content = fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(base) = path.parent()
            && !base.as_os_str().is_empty()
        {
            config.inputs = config.inputs.iter().map(|input| base.join(input)).collect();
            config.output = base.join(&config.output);
        }
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, GeneratorError> {
        toml::from_str(content).map_err(|e| GeneratorError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.runtime_crate, "trellis");
        assert_eq!(config.aggregate_file, "adapters.rs");
    }

    #[test]
    fn parses_all_fields() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            inputs = ["src/schema.rs", "src/more.rs"]
            output = "out"
            runtime_crate = "crate"
            aggregate_file = "all.rs"
            "#,
        )
        .unwrap();
        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.output, PathBuf::from("out"));
        assert_eq!(config.runtime_crate, "crate");
        assert_eq!(config.aggregate_file, "all.rs");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = GeneratorConfig::from_toml_str("outputs = \"out\"").unwrap_err();
        assert!(matches!(err, GeneratorError::ConfigError(_)));
    }

    #[test]
    fn file_paths_are_relative_to_the_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "inputs = [\"schema.rs\"]\noutput = \"gen\"\n").unwrap();

        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.inputs, vec![temp_dir.path().join("schema.rs")]);
        assert_eq!(config.output, temp_dir.path().join("gen"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = GeneratorConfig::from_file(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, GeneratorError::ReadError { .. }));
    }
}
