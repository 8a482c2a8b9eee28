use super::document::{Automation, Document, Integration};
use crate::error::LoadError;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.get(*key))
        .filter(|v| !v.is_null())
}

impl Document {
    /// Parses a document from YAML text.
    ///
    /// A mapping-valued `script` key marks an integration; anything else is an automation.
    /// Absent or `null` collections come out as empty lists.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_yaml_value(value)
    }

    pub fn from_yaml_value(value: Value) -> Result<Self, LoadError> {
        if lookup(&value, &["commonfields", "id"]).is_none() {
            return Err(LoadError::MissingField("commonfields.id"));
        }
        if lookup(&value, &["name"]).is_none() {
            return Err(LoadError::MissingField("name"));
        }
        let is_integration = match value.get("script") {
            Some(Value::Mapping(_)) => true,
            Some(_) => false,
            None if value.get("configuration").is_some() => {
                return Err(LoadError::MissingField("script"));
            }
            None => false,
        };

        if is_integration {
            Ok(Document::Integration(serde_yaml::from_value::<Integration>(value)?))
        } else {
            Ok(Document::Automation(serde_yaml::from_value::<Automation>(value)?))
        }
    }

    /// Loads a document from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Serializes the full document back to YAML.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
