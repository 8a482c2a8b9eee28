//! Conversion between typed field values and their rendered form representation,
//! plus the identifier scheme every rendered element is addressed by.

use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

/// A raw value as it arrives from a form control.
///
/// Checkboxes produce flags, selects and text inputs produce text, and multi-value
/// controls may already produce a split list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Flag(bool),
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl From<bool> for FieldInput {
    fn from(value: bool) -> Self {
        FieldInput::Flag(value)
    }
}

impl From<i64> for FieldInput {
    fn from(value: i64) -> Self {
        FieldInput::Number(value)
    }
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        FieldInput::Text(value.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        FieldInput::Text(value)
    }
}

impl From<Vec<String>> for FieldInput {
    fn from(value: Vec<String>) -> Self {
        FieldInput::List(value)
    }
}

impl From<Vec<&str>> for FieldInput {
    fn from(value: Vec<&str>) -> Self {
        FieldInput::List(value.into_iter().map(str::to_string).collect())
    }
}

/// The full set of raw field values of one fragment, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldBag(AHashMap<String, FieldInput>);

/// A `null` value is the same as an absent field.
impl<'de> Deserialize<'de> for FieldBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = AHashMap::<String, Option<FieldInput>>::deserialize(deserializer)?;
        Ok(FieldBag(
            raw.into_iter()
                .filter_map(|(key, value)| Some((key, value?)))
                .collect(),
        ))
    }
}

impl FieldBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<FieldInput>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<FieldInput>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldInput> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldInput> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).sorted().collect()
    }

    /// Overlays every field of `other` onto this bag.
    pub fn merge(&mut self, other: FieldBag) {
        self.0.extend(other.0);
    }

    /// Reads a field as text. Flags and numbers are stringified, lists newline-joined.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(|input| match input {
            FieldInput::Text(s) => s.clone(),
            FieldInput::Number(n) => n.to_string(),
            FieldInput::Flag(b) => b.to_string(),
            FieldInput::List(items) => items.join("\n"),
        })
    }

    /// Reads a field as text, treating an empty string as absent.
    pub fn non_empty_text(&self, key: &str) -> Option<String> {
        self.text(key).filter(|s| !s.is_empty())
    }

    pub fn text_or_default(&self, key: &str) -> String {
        self.text(key).unwrap_or_default()
    }

    /// Reads a field as a flag. Text values `true`, `on`, `yes` and `1` count as set.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            FieldInput::Flag(b) => Some(*b),
            FieldInput::Number(n) => Some(*n != 0),
            FieldInput::Text(s) => Some(matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "on" | "yes" | "1"
            )),
            FieldInput::List(_) => None,
        }
    }

    pub fn flag_or_default(&self, key: &str) -> bool {
        self.flag(key).unwrap_or(false)
    }

    /// Reads a field as an ordered list. A text blob is split on newlines.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            FieldInput::List(items) => Some(items.clone()),
            FieldInput::Text(s) => Some(split_lines(s)),
            FieldInput::Flag(_) | FieldInput::Number(_) => None,
        }
    }

    pub fn number(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            FieldInput::Number(n) => Some(*n),
            FieldInput::Text(s) => s.trim().parse().ok(),
            FieldInput::Flag(_) | FieldInput::List(_) => None,
        }
    }

    /// Typed read of one field, see [`decode_from_display`].
    pub fn decode(&self, key: &str, kind: FieldKind) -> Option<FieldValue> {
        self.get(key).map(|input| decode_from_display(input, kind))
    }
}

impl<K: Into<String>, V: Into<FieldInput>> FromIterator<(K, V)> for FieldBag {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for FieldBag {
    type Item = (String, FieldInput);
    type IntoIter = std::collections::hash_map::IntoIter<String, FieldInput>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The shape a field takes on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
    List,
}

/// A typed field value as stored in the document model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Flag(_) => FieldKind::Flag,
            FieldValue::List(_) => FieldKind::List,
        }
    }
}

/// The value a form control is rendered with. Text is held unescaped; escaping happens
/// once, when the fragment is serialized to markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayToken {
    Checked(bool),
    Text(String),
    Multiline(String),
}

impl DisplayToken {
    /// What the display host reads back out of a control rendered with this token.
    pub fn to_input(&self) -> FieldInput {
        match self {
            DisplayToken::Checked(b) => FieldInput::Flag(*b),
            DisplayToken::Text(s) | DisplayToken::Multiline(s) => FieldInput::Text(s.clone()),
        }
    }
}

pub fn encode_for_display(value: &FieldValue) -> DisplayToken {
    match value {
        FieldValue::Flag(b) => DisplayToken::Checked(*b),
        FieldValue::Text(s) => DisplayToken::Text(s.clone()),
        FieldValue::List(items) => DisplayToken::Multiline(items.join("\n")),
    }
}

pub fn decode_from_display(input: &FieldInput, kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Flag => {
            let bag = FieldBag::new().with("v", input.clone());
            FieldValue::Flag(bag.flag_or_default("v"))
        }
        FieldKind::List => match input {
            FieldInput::List(items) => FieldValue::List(items.clone()),
            FieldInput::Text(s) => FieldValue::List(split_lines(s)),
            FieldInput::Number(n) => FieldValue::List(vec![n.to_string()]),
            FieldInput::Flag(b) => FieldValue::List(vec![b.to_string()]),
        },
        FieldKind::Text => {
            let bag = FieldBag::new().with("v", input.clone());
            FieldValue::Text(bag.text_or_default("v"))
        }
    }
}

/// Splits a multi-line text block into its lines, discarding empty ones.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Escapes `&`, `<`, `>` and both quote characters for embedding in markup.
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Every addressable element type in a rendered document.
///
/// Each kind has a fixed number of index coordinates and a unique prefix that never
/// ends in a digit, so ids of different kinds cannot collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Document,
    Basic,
    Advanced,
    Diagnostics,
    ConfigurationList,
    Configuration,
    CommandList,
    Command,
    CommandArgumentList,
    CommandArgument,
    CommandOutputList,
    CommandOutput,
    ArgumentList,
    Argument,
    OutputList,
    Output,
}

impl ElementKind {
    pub const ALL: [ElementKind; 16] = [
        ElementKind::Document,
        ElementKind::Basic,
        ElementKind::Advanced,
        ElementKind::Diagnostics,
        ElementKind::ConfigurationList,
        ElementKind::Configuration,
        ElementKind::CommandList,
        ElementKind::Command,
        ElementKind::CommandArgumentList,
        ElementKind::CommandArgument,
        ElementKind::CommandOutputList,
        ElementKind::CommandOutput,
        ElementKind::ArgumentList,
        ElementKind::Argument,
        ElementKind::OutputList,
        ElementKind::Output,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            ElementKind::Document => "document",
            ElementKind::Basic => "basic",
            ElementKind::Advanced => "advanced",
            ElementKind::Diagnostics => "diagnostics",
            ElementKind::ConfigurationList => "configuration-list",
            ElementKind::Configuration => "configuration",
            ElementKind::CommandList => "command-list",
            ElementKind::Command => "command",
            ElementKind::CommandArgumentList => "command-argument-list",
            ElementKind::CommandArgument => "command-argument",
            ElementKind::CommandOutputList => "command-output-list",
            ElementKind::CommandOutput => "command-output",
            ElementKind::ArgumentList => "argument-list",
            ElementKind::Argument => "argument",
            ElementKind::OutputList => "output-list",
            ElementKind::Output => "output",
        }
    }

    /// Number of index coordinates an element of this kind is addressed by.
    pub fn arity(self) -> usize {
        match self {
            ElementKind::Document
            | ElementKind::Basic
            | ElementKind::Advanced
            | ElementKind::Diagnostics
            | ElementKind::ConfigurationList
            | ElementKind::CommandList
            | ElementKind::ArgumentList
            | ElementKind::OutputList => 0,
            ElementKind::Configuration
            | ElementKind::Command
            | ElementKind::CommandArgumentList
            | ElementKind::CommandOutputList
            | ElementKind::Argument
            | ElementKind::Output => 1,
            ElementKind::CommandArgument | ElementKind::CommandOutput => 2,
        }
    }
}

/// Builds the id of the element of `kind` at `indices`.
pub fn make_id(kind: ElementKind, indices: &[usize]) -> String {
    debug_assert_eq!(
        indices.len(),
        kind.arity(),
        "wrong coordinate count for {:?}",
        kind
    );
    if indices.is_empty() {
        kind.prefix().to_string()
    } else {
        format!("{}-{}", kind.prefix(), indices.iter().join("-"))
    }
}

/// Builds the id of one form control inside an element.
pub fn make_field_id(kind: ElementKind, indices: &[usize], field: &str) -> String {
    format!("{}--{}", make_id(kind, indices), field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_do_not_collide_across_kinds() {
        let mut seen = HashSet::new();
        for kind in ElementKind::ALL {
            let coords: Vec<Vec<usize>> = match kind.arity() {
                0 => vec![vec![]],
                1 => (0..12).map(|i| vec![i]).collect(),
                _ => (0..12)
                    .flat_map(|i| (0..12).map(move |j| vec![i, j]))
                    .collect(),
            };
            for c in coords {
                assert!(seen.insert(make_id(kind, &c)), "collision for {:?} {:?}", kind, c);
            }
        }
    }

    #[test]
    fn escape_is_applied_once() {
        assert_eq!(escape_markup("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_markup("&amp;"), "&amp;amp;");
        assert!(matches!(escape_markup("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn split_discards_blank_lines() {
        assert_eq!(split_lines("a\n\nb\r\n  \nc"), vec!["a", "b", "c"]);
    }
}
