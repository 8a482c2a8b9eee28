//! # Henshu - Form Editor Engine for Integration and Automation Documents
//!
//! **Henshu** loads an Integration or Automation YAML document, renders it as a set of
//! independently replaceable form fragments, and keeps the in-memory model and the
//! display in sync through a small message protocol. The display host is abstract: it
//! receives patch instructions and notices, and sends back one message per user edit.
//!
//! ## Core Workflow
//!
//! 1.  **Open a Session**: [`sync::Session::open`] parses the YAML file into a typed
//!     [`model::Document`]. A load failure means no session exists.
//! 2.  **Show the Document**: a [`sync::Controller`] posts the full render of the
//!     document to its [`sync::DisplaySurface`].
//! 3.  **Exchange Messages**: each inbound JSON message is one atomic transition. The
//!     model is updated first, then only the affected fragments are re-rendered.
//! 4.  **Save**: a `save` message hands the document to a [`sync::Persistence`].
//!
//! Configuration parameters are polymorphic over a fixed set of kinds. The
//! [`registry`] module owns the per-kind construction, field layout and change hooks,
//! so adding a kind touches nothing outside it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use henshu::prelude::*;
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Printer;
//!
//! impl DisplaySurface for Printer {
//!     fn post(&mut self, instruction: Instruction) {
//!         println!("{} -> {}", instruction.container_id, instruction.fragment_markup);
//!     }
//!     fn notify(&mut self, notice: Notice) {
//!         println!("{:?}: {}", notice.level, notice.message);
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let session = Session::open("integration.yml")?;
//!     let mut controller =
//!         Controller::new(session, Renderer::default(), Printer, YamlFilePersistence);
//!     controller.show()?;
//!
//!     controller.dispatch(&json!({
//!         "command": "addConfiguration",
//!         "data": { "name": "url", "display": "Server URL", "type": 0, "required": true }
//!     }));
//!     controller.dispatch(&json!({ "command": "save" }));
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod prelude;
pub mod registry;
pub mod render;
pub mod sync;
