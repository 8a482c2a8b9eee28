use crate::codec::FieldInput;
use crate::error::ModelError;
use std::fmt;

/// Master macro defining the closed set of configuration parameter kinds, their numeric
/// discriminants and display labels in one table.
macro_rules! define_parameter_kinds {
    ( $( ($variant:ident, $discriminant:literal, $label:expr) ),* $(,)? ) => {
        /// The concrete shape of a configuration parameter.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ParameterKind {
            $( $variant ),*
        }

        impl ParameterKind {
            /// Every kind, in discriminant order.
            pub const ALL: &'static [ParameterKind] = &[ $( ParameterKind::$variant ),* ];

            /// The numeric discriminant stored in the document's `type` key.
            pub fn discriminant(self) -> i64 {
                match self {
                    $( ParameterKind::$variant => $discriminant, )*
                }
            }

            /// Human-readable name shown in the kind selector.
            pub fn label(self) -> &'static str {
                match self {
                    $( ParameterKind::$variant => $label, )*
                }
            }

            pub fn from_discriminant(discriminant: i64) -> Option<Self> {
                match discriminant {
                    $( $discriminant => Some(ParameterKind::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

define_parameter_kinds! {
    (ShortText, 0, "Short text"),
    (Encrypted, 4, "Encrypted"),
    (Boolean, 8, "Boolean"),
    (Authentication, 9, "Authentication"),
    (LongText, 12, "Long text"),
    (SingleSelect, 15, "Single select"),
    (MultiSelect, 16, "Multi select"),
}

impl ParameterKind {
    /// Whether the kind carries an ordered list of option strings.
    pub fn has_options(self) -> bool {
        matches!(self, ParameterKind::SingleSelect | ParameterKind::MultiSelect)
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.discriminant())
    }
}

/// Maps a raw kind discriminant to its concrete kind.
///
/// Accepts the discriminant as a number or as numeric text, since select controls
/// report their value as text.
pub fn classify(raw: &FieldInput) -> Result<ParameterKind, ModelError> {
    let discriminant = match raw {
        FieldInput::Number(n) => Some(*n),
        FieldInput::Text(s) => s.trim().parse::<i64>().ok(),
        FieldInput::Flag(_) | FieldInput::List(_) => None,
    };
    discriminant
        .and_then(ParameterKind::from_discriminant)
        .ok_or_else(|| ModelError::UnknownKind {
            discriminant: describe(raw),
        })
}

fn describe(raw: &FieldInput) -> String {
    match raw {
        FieldInput::Number(n) => n.to_string(),
        FieldInput::Text(s) => s.clone(),
        FieldInput::Flag(b) => b.to_string(),
        FieldInput::List(items) => format!("[{}]", items.join(", ")),
    }
}
