use crate::error::LoadError;
use crate::model::Document;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One editing session: exclusive owner of a loaded document.
///
/// Created when the document loads and consumed by [`Session::close`].
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    document: Document,
    dirty: bool,
}

impl Session {
    /// Loads the document at `path`. A failure here means the session never begins.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let document = Document::from_file(&path)?;
        info!(path = %path.display(), name = document.name(), "session opened");
        Ok(Self::from_document(path, document))
    }

    pub fn from_document(path: impl Into<PathBuf>, document: Document) -> Self {
        Self {
            path: path.into(),
            document,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Whether the document changed since it was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Ends the session, handing back the document.
    pub fn close(self) -> Document {
        debug!(path = %self.path.display(), dirty = self.dirty, "session closed");
        self.document
    }
}
