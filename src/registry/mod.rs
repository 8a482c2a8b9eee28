//! The closed set of configuration parameter kinds, with per-kind construction,
//! layout and change rules dispatched from one table.

mod kinds;
mod layout;

pub use kinds::{ParameterKind, classify};
pub use layout::render;

use crate::codec::FieldBag;
use crate::error::ModelError;
use crate::model::{ConfigurationParameter, ParameterCommon, Scalar};

/// Default label given to the password field when it is switched on empty.
pub const PASSWORD_SENTINEL: &str = "Password";

/// Builds the concrete parameter of `kind` from a raw field set, applying kind defaults.
pub fn construct(kind: ParameterKind, fields: &FieldBag) -> ConfigurationParameter {
    let common = ParameterCommon {
        name: fields.text_or_default("name"),
        display: fields.text_or_default("display"),
        required: fields.flag_or_default("required").into(),
        default_value: match kind {
            ParameterKind::MultiSelect => fields
                .list("defaultvalue")
                .map(|values| values.join(","))
                .filter(|joined| !joined.is_empty()),
            _ => fields.non_empty_text("defaultvalue"),
        }
        .map(Scalar::from),
        additional_info: fields.non_empty_text("additionalinfo"),
        extra: Default::default(),
    };
    let options = || fields.list("options").unwrap_or_default();
    match kind {
        ParameterKind::ShortText => ConfigurationParameter::ShortText(common),
        ParameterKind::LongText => ConfigurationParameter::LongText(common),
        ParameterKind::Boolean => ConfigurationParameter::Boolean(common),
        ParameterKind::Encrypted => ConfigurationParameter::Encrypted(common),
        ParameterKind::Authentication => ConfigurationParameter::Authentication {
            common,
            display_password: fields.text_or_default("displaypassword"),
            hidden_username: fields
                .flag("hiddenusername")
                .or_else(|| fields.flag("showusername").map(|shown| !shown))
                .unwrap_or(false)
                .into(),
        },
        ParameterKind::SingleSelect => ConfigurationParameter::SingleSelect {
            common,
            options: options(),
        },
        ParameterKind::MultiSelect => ConfigurationParameter::MultiSelect {
            common,
            options: options(),
        },
    }
}

/// Classifies the `type` field of `fields` and constructs the matching parameter.
pub fn construct_from_fields(fields: &FieldBag) -> Result<ConfigurationParameter, ModelError> {
    let raw = fields.get("type").ok_or_else(|| ModelError::UnknownKind {
        discriminant: "<missing>".to_string(),
    })?;
    let kind = classify(raw)?;
    Ok(construct(kind, fields))
}

/// Per-kind rules applied to a fragment's field set before a change is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeHook {
    /// The show-username / show-password toggles of an Authentication parameter.
    AuthenticationToggles,
}

impl ChangeHook {
    pub fn name(self) -> &'static str {
        match self {
            ChangeHook::AuthenticationToggles => "authentication",
        }
    }

    /// Applies the rule for a change of `changed` to `fields`. Returns the controls whose
    /// enabled state the display must update, with their new state.
    pub fn apply(self, changed: &str, fields: &mut FieldBag) -> Vec<(&'static str, bool)> {
        match self {
            ChangeHook::AuthenticationToggles => match changed {
                "showusername" => {
                    let shown = fields.flag_or_default("showusername");
                    if !shown {
                        fields.insert("display", "");
                    }
                    fields.insert("hiddenusername", !shown);
                    vec![("display", shown)]
                }
                "showpassword" => {
                    let shown = fields.flag_or_default("showpassword");
                    if !shown {
                        fields.insert("displaypassword", "");
                    } else if fields.non_empty_text("displaypassword").is_none() {
                        fields.insert("displaypassword", PASSWORD_SENTINEL);
                    }
                    vec![("displaypassword", shown)]
                }
                _ => Vec::new(),
            },
        }
    }
}
