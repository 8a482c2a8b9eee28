use super::protocol::{Instruction, Notice};
use crate::error::PersistError;
use crate::model::Document;
use std::fs;
use std::path::Path;
use tracing::info;

/// The display host. Delivery is fire-and-forget; nothing is acknowledged.
pub trait DisplaySurface {
    fn post(&mut self, instruction: Instruction);
    fn notify(&mut self, notice: Notice);
}

/// Writes the document somewhere when the user saves.
pub trait Persistence {
    fn save(&mut self, path: &Path, document: &Document) -> Result<(), PersistError>;
}

/// Persists documents as YAML files at their session path.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFilePersistence;

impl Persistence for YamlFilePersistence {
    fn save(&mut self, path: &Path, document: &Document) -> Result<(), PersistError> {
        let text = document.to_yaml_string()?;
        fs::write(path, text).map_err(|source| PersistError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "document saved");
        Ok(())
    }
}
