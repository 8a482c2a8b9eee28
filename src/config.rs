use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Editor settings, loadable from a YAML file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Default `tracing` filter directive used by the CLI when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Persist the document when the inbound message stream ends.
    pub save_on_close: bool,
    pub new_elements: NewElementDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            save_on_close: false,
            new_elements: NewElementDefaults::default(),
        }
    }
}

/// Field values carried by the add controls of each collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewElementDefaults {
    pub command_name: String,
    pub argument_name: String,
    pub output_context_path: String,
    pub parameter_name: String,
}

impl Default for NewElementDefaults {
    fn default() -> Self {
        Self {
            command_name: "new-command".to_string(),
            argument_name: "new-argument".to_string(),
            output_context_path: "Output.Path".to_string(),
            parameter_name: "new-parameter".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Loads `path` if it exists, falling back to defaults when it does not.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
