//! Prelude module for convenient imports
//!
//! Re-exports the types needed to open a document, drive a session and inspect the
//! result.
//!
//! ```rust,no_run
//! use henshu::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = Document::from_file("automation.yml")?;
//! println!("{} has {} parameters", document.name(), document.configuration().len());
//! # Ok(())
//! # }
//! ```

// Model
pub use crate::model::{
    Argument, Collection, Command, ConfigurationParameter, Document, DocumentKind, Output,
    OutputType, Scope,
};
pub use crate::registry::ParameterKind;

// Field values exchanged with the display
pub use crate::codec::{FieldBag, FieldInput};

// Rendering
pub use crate::render::{Fragment, Renderer};

// Session and protocol
pub use crate::sync::{
    Controller, DisplaySurface, InboundMessage, Instruction, Notice, NoticeLevel, Persistence,
    Session, YamlFilePersistence,
};

// Settings and diagnostics
pub use crate::config::EditorConfig;
pub use crate::diagnostics::LintReport;

// Error types
pub use crate::error::{LoadError, ModelError, SessionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
