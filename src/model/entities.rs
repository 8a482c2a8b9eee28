use super::{Flag, Scalar, de_scalar_opt, de_seq_or_null, de_text_or_list};
use crate::codec::FieldBag;
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::fmt;
use std::str::FromStr;

/// The `commonfields` block shared by both document variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonFields {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// One command exposed by an integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Flag::is_unset")]
    pub deprecated: Flag,
    #[serde(
        default,
        deserialize_with = "de_seq_or_null",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub arguments: Vec<Argument>,
    #[serde(
        default,
        deserialize_with = "de_seq_or_null",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub outputs: Vec<Output>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Command {
    /// Builds a command from a fragment's field set. Arguments, outputs and unmodelled
    /// keys are taken over from `previous` when replacing an existing command.
    pub fn from_fields(fields: &FieldBag, previous: Option<Command>) -> Self {
        let previous = previous.unwrap_or_default();
        Self {
            name: fields.text_or_default("name"),
            description: fields.text_or_default("description"),
            deprecated: previous
                .deprecated
                .updated(fields.flag_or_default("deprecated")),
            arguments: previous.arguments,
            outputs: previous.outputs,
            extra: previous.extra,
        }
    }
}

/// An input argument of a command or automation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Flag::is_unset")]
    pub required: Flag,
    #[serde(default, rename = "isArray", skip_serializing_if = "Flag::is_unset")]
    pub is_array: Flag,
    #[serde(
        default,
        rename = "defaultValue",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_scalar_opt"
    )]
    pub default_value: Option<Scalar>,
    /// Allowed values. Always a split list once stored, whatever shape it arrived in.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_text_or_list"
    )]
    pub predefined: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Argument {
    /// Builds an argument from a fragment's field set. Unmodelled keys, listed flags and
    /// the YAML type of an unchanged default are taken over from `previous`.
    pub fn from_fields(fields: &FieldBag, previous: Option<Argument>) -> Self {
        let previous = previous.unwrap_or_default();
        Self {
            name: fields.text_or_default("name"),
            description: fields.text_or_default("description"),
            required: previous.required.updated(fields.flag_or_default("required")),
            is_array: previous.is_array.updated(fields.flag_or_default("isArray")),
            default_value: fields
                .non_empty_text("defaultValue")
                .map(|text| Scalar::from(text).keep_type_of(previous.default_value.as_ref())),
            predefined: fields.list("predefined").filter(|values| !values.is_empty()),
            extra: previous.extra,
        }
    }
}

/// The type tag of a context output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputType {
    #[default]
    Unknown,
    Number,
    String,
    Date,
    Boolean,
}

impl OutputType {
    pub const ALL: [OutputType; 5] = [
        OutputType::Unknown,
        OutputType::Number,
        OutputType::String,
        OutputType::Date,
        OutputType::Boolean,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputType::Unknown => "Unknown",
            OutputType::Number => "Number",
            OutputType::String => "String",
            OutputType::Date => "Date",
            OutputType::Boolean => "Boolean",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(OutputType::Unknown);
        }
        OutputType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::InvalidField {
                field: "type".to_string(),
                reason: format!("'{}' is not an output type", trimmed),
            })
    }
}

impl TryFrom<String> for OutputType {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputType> for String {
    fn from(value: OutputType) -> Self {
        value.as_str().to_string()
    }
}

/// A context output of a command or automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(default, rename = "contextPath")]
    pub context_path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub output_type: OutputType,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Output {
    pub fn from_fields(fields: &FieldBag, previous_extra: Option<Mapping>) -> Result<Self, ModelError> {
        let output_type = match fields.text("type") {
            Some(raw) => raw.parse()?,
            None => OutputType::Unknown,
        };
        Ok(Self {
            context_path: fields.text_or_default("contextPath"),
            description: fields.text_or_default("description"),
            output_type,
            extra: previous_extra.unwrap_or_default(),
        })
    }
}

/// Runtime settings edited in the advanced section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedSettings {
    pub docker_image: Option<String>,
    pub long_running: bool,
    /// Only ever set while `long_running` is set.
    pub long_running_port: Option<bool>,
}

impl AdvancedSettings {
    /// Reads the advanced field set, discarding the port flag unless long-running is on.
    pub fn from_fields(fields: &FieldBag) -> Self {
        let long_running = fields.flag_or_default("longRunning");
        Self {
            docker_image: fields
                .non_empty_text("dockerimage")
                .or_else(|| fields.non_empty_text("dockerImage")),
            long_running,
            long_running_port: if long_running {
                Some(fields.flag_or_default("longRunningPort"))
            } else {
                None
            },
        }
    }
}
