//! Messages exchanged with the display surface.
//!
//! Inbound messages are JSON objects tagged by `command`. Outbound traffic is either a
//! patch instruction (`add` / `replace` a container's fragment) or a user notice.

use crate::codec::FieldBag;
use crate::error::MessageError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every command tag the controller understands.
pub const KNOWN_COMMANDS: &[&str] = &[
    "save",
    "updateBasic",
    "updateAdvanced",
    "addConfiguration",
    "updateConfiguration",
    "removeConfiguration",
    "addCommand",
    "updateCommand",
    "removeCommand",
    "addArgument",
    "updateArgument",
    "removeArgument",
    "addOutput",
    "updateOutput",
    "removeOutput",
];

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
    tag = "command",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum InboundMessage {
    Save,
    UpdateBasic {
        data: FieldBag,
    },
    UpdateAdvanced {
        data: FieldBag,
    },
    AddConfiguration {
        data: FieldBag,
    },
    UpdateConfiguration {
        configuration_index: usize,
        data: FieldBag,
    },
    RemoveConfiguration {
        configuration_index: usize,
    },
    AddCommand {
        data: FieldBag,
    },
    UpdateCommand {
        index: usize,
        data: FieldBag,
    },
    RemoveCommand {
        index: usize,
    },
    AddArgument {
        command_index: Option<usize>,
        index: Option<usize>,
        data: FieldBag,
    },
    UpdateArgument {
        command_index: Option<usize>,
        index: usize,
        data: FieldBag,
    },
    RemoveArgument {
        command_index: Option<usize>,
        index: usize,
    },
    AddOutput {
        command_index: Option<usize>,
        index: Option<usize>,
        data: FieldBag,
    },
    UpdateOutput {
        command_index: Option<usize>,
        index: usize,
        data: FieldBag,
    },
    RemoveOutput {
        command_index: Option<usize>,
        index: usize,
    },
}

impl InboundMessage {
    /// Decodes a raw message, telling an unknown tag apart from a bad payload.
    pub fn parse(raw: &Value) -> Result<Self, MessageError> {
        let command = raw
            .get("command")
            .and_then(Value::as_str)
            .ok_or(MessageError::MissingCommand)?;
        if !KNOWN_COMMANDS.contains(&command) {
            return Err(MessageError::Malformed {
                command: command.to_string(),
            });
        }
        Self::deserialize(raw).map_err(|e| MessageError::InvalidPayload {
            command: command.to_string(),
            reason: e.to_string(),
        })
    }

    /// The command tag, for logging.
    pub fn tag(&self) -> &'static str {
        match self {
            InboundMessage::Save => "save",
            InboundMessage::UpdateBasic { .. } => "updateBasic",
            InboundMessage::UpdateAdvanced { .. } => "updateAdvanced",
            InboundMessage::AddConfiguration { .. } => "addConfiguration",
            InboundMessage::UpdateConfiguration { .. } => "updateConfiguration",
            InboundMessage::RemoveConfiguration { .. } => "removeConfiguration",
            InboundMessage::AddCommand { .. } => "addCommand",
            InboundMessage::UpdateCommand { .. } => "updateCommand",
            InboundMessage::RemoveCommand { .. } => "removeCommand",
            InboundMessage::AddArgument { .. } => "addArgument",
            InboundMessage::UpdateArgument { .. } => "updateArgument",
            InboundMessage::RemoveArgument { .. } => "removeArgument",
            InboundMessage::AddOutput { .. } => "addOutput",
            InboundMessage::UpdateOutput { .. } => "updateOutput",
            InboundMessage::RemoveOutput { .. } => "removeOutput",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    /// Append the fragment inside the container.
    Add,
    /// Replace the container with the fragment.
    Replace,
}

/// A patch for the display surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub command: PatchKind,
    pub container_id: String,
    pub fragment_markup: String,
}

impl Instruction {
    pub fn add(container_id: String, fragment_markup: String) -> Self {
        Self {
            command: PatchKind::Add,
            container_id,
            fragment_markup,
        }
    }

    pub fn replace(container_id: String, fragment_markup: String) -> Self {
        Self {
            command: PatchKind::Replace,
            container_id,
            fragment_markup,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A single human-readable notification for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename = "notify")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
