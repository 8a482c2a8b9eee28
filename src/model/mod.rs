//! The in-memory document model: one editable Integration or Automation definition
//! with index-addressed collections of repeatable entities.

mod document;
mod entities;
mod io;
mod parameter;

pub use document::{Automation, Document, DocumentKind, Integration, IntegrationScript};
pub use entities::{AdvancedSettings, Argument, Command, CommonFields, Output, OutputType};
pub use parameter::{ConfigurationParameter, ParameterCommon};

use crate::codec::split_lines;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use std::ops::Deref;

/// Where an argument or output collection hangs in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The document root (Automation documents).
    Root,
    /// The command at this index (Integration documents).
    Command(usize),
}

impl Scope {
    pub fn from_command_index(command_index: Option<usize>) -> Self {
        command_index.map_or(Scope::Root, Scope::Command)
    }

    pub fn command_index(self) -> Option<usize> {
        match self {
            Scope::Root => None,
            Scope::Command(index) => Some(index),
        }
    }
}

/// An index-addressed collection of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Configurations,
    Commands,
    Arguments(Scope),
    Outputs(Scope),
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Configurations => "configuration",
            Collection::Commands => "commands",
            Collection::Arguments(_) => "arguments",
            Collection::Outputs(_) => "outputs",
        }
    }
}

/// A boolean key that remembers whether the file spelled it out. An explicit `false`
/// is written back on save; an absent one is not invented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag {
    value: bool,
    listed: bool,
}

impl Flag {
    pub fn get(self) -> bool {
        self.value
    }

    /// The same key holding `value`. It stays unlisted while it is false and was unlisted.
    pub fn updated(self, value: bool) -> Flag {
        Flag {
            value,
            listed: self.listed || value,
        }
    }

    pub(crate) fn is_unset(&self) -> bool {
        !self.value && !self.listed
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag::default().updated(value)
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.value)
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = bool::deserialize(deserializer)?;
        Ok(Flag {
            value,
            listed: true,
        })
    }
}

/// A scalar edited as text that keeps the YAML type it was read with, so `true` or `50`
/// are saved unquoted while their text is unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    text: String,
    source: Option<Value>,
}

impl Scalar {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Takes over the YAML type of `previous`: its exact value when the text is the
    /// same, otherwise a boolean or number when the new text still reads as one.
    pub fn keep_type_of(mut self, previous: Option<&Scalar>) -> Self {
        let Some(previous) = previous else {
            return self;
        };
        self.source = if previous.text == self.text {
            previous.source.clone()
        } else {
            match previous.source {
                Some(Value::Bool(_)) => self.text.parse::<bool>().ok().map(Value::Bool),
                Some(Value::Number(_)) => self
                    .text
                    .parse::<i64>()
                    .map(Value::from)
                    .or_else(|_| self.text.parse::<f64>().map(Value::from))
                    .ok(),
                _ => None,
            }
        };
        self
    }

    fn from_yaml(value: Value) -> Option<Self> {
        let source = match value {
            Value::String(_) => None,
            ref other => Some(other.clone()),
        };
        scalar_to_string(value).map(|text| Scalar { text, source })
    }
}

impl From<String> for Scalar {
    fn from(text: String) -> Self {
        Scalar { text, source: None }
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::from(text.to_string())
    }
}

impl Deref for Scalar {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.source {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_str(&self.text),
        }
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_to_string(tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Accepts any YAML scalar where a string is expected.
pub(crate) fn de_text_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_to_string))
}

/// Like [`de_text_opt`], remembering the scalar's YAML type.
pub(crate) fn de_scalar_opt<'de, D>(deserializer: D) -> Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(Scalar::from_yaml))
}

/// Accepts a newline-delimited text block or a sequence of scalars, storing a list.
pub(crate) fn de_text_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(split_lines(&text)),
        Some(Value::Sequence(items)) => {
            Some(items.into_iter().filter_map(scalar_to_string).collect())
        }
        Some(other) => scalar_to_string(other).map(|s| vec![s]),
    })
}

/// Treats an explicit `null` collection the same as an absent one.
pub(crate) fn de_seq_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
