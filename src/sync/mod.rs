//! The editing session and its message protocol with the display surface.

mod controller;
pub mod protocol;
mod session;
mod surface;

pub use controller::Controller;
pub use protocol::{InboundMessage, Instruction, Notice, NoticeLevel, PatchKind};
pub use session::Session;
pub use surface::{DisplaySurface, Persistence, YamlFilePersistence};
