//! Lint reports produced by an external validator, surfaced next to the form.

use crate::render::Element;
use ahash::AHashMap;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "Error", alias = "ERROR")]
    Error,
    #[serde(alias = "Warning", alias = "WARNING", alias = "warn")]
    Warning,
    #[serde(other)]
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// One finding of the validator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub col: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn to_element(&self) -> Element {
        Element::new("li")
            .class(match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "info",
            })
            .child(format!("{}:{} {}", self.row, self.col, self.message))
    }
}

/// A validator report keyed by file path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LintReport(AHashMap<String, Vec<Diagnostic>>);

impl LintReport {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Diagnostics reported for `path`, matching on trailing path components so that
    /// relative and absolute spellings of the same file agree.
    pub fn for_path(&self, path: &Path) -> Vec<&Diagnostic> {
        let mut found: Vec<&Diagnostic> = self
            .0
            .iter()
            .filter(|(key, _)| {
                let key = Path::new(key.as_str());
                key == path || path.ends_with(key) || key.ends_with(path)
            })
            .flat_map(|(_, diagnostics)| diagnostics.iter())
            .collect();
        found.sort_by_key(|d| (d.row, d.col));
        found
    }
}

/// One-line summary such as `3 problems (1 error, 2 warnings)`.
pub fn summarize(diagnostics: &[&Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return "No problems found".to_string();
    }
    let count = |severity| diagnostics.iter().filter(|d| d.severity == severity).count();
    let plural = |n: usize, word: &str| {
        if n == 1 {
            format!("{} {}", n, word)
        } else {
            format!("{} {}s", n, word)
        }
    };
    format!(
        "{} ({}, {})",
        plural(diagnostics.len(), "problem"),
        plural(count(Severity::Error), "error"),
        plural(count(Severity::Warning), "warning"),
    )
}
