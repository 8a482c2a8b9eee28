use super::{Flag, Scalar, de_scalar_opt, de_text_opt, de_text_or_list};
use crate::error::ModelError;
use crate::registry::ParameterKind;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// Fields shared by every configuration parameter kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterCommon {
    pub name: String,
    pub display: String,
    pub required: Flag,
    pub default_value: Option<Scalar>,
    pub additional_info: Option<String>,
    /// Keys the editor does not model, kept for round-tripping.
    pub extra: Mapping,
}

/// One integration configuration parameter. The variant is the kind; the numeric
/// discriminant is derived from it and never stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameter", into = "RawParameter")]
pub enum ConfigurationParameter {
    ShortText(ParameterCommon),
    LongText(ParameterCommon),
    Boolean(ParameterCommon),
    Encrypted(ParameterCommon),
    Authentication {
        common: ParameterCommon,
        /// Label of the secondary (password) field. Empty hides it.
        display_password: String,
        /// Whether the primary (username) field is hidden.
        hidden_username: Flag,
    },
    SingleSelect {
        common: ParameterCommon,
        options: Vec<String>,
    },
    MultiSelect {
        common: ParameterCommon,
        options: Vec<String>,
    },
}

impl ConfigurationParameter {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ConfigurationParameter::ShortText(_) => ParameterKind::ShortText,
            ConfigurationParameter::LongText(_) => ParameterKind::LongText,
            ConfigurationParameter::Boolean(_) => ParameterKind::Boolean,
            ConfigurationParameter::Encrypted(_) => ParameterKind::Encrypted,
            ConfigurationParameter::Authentication { .. } => ParameterKind::Authentication,
            ConfigurationParameter::SingleSelect { .. } => ParameterKind::SingleSelect,
            ConfigurationParameter::MultiSelect { .. } => ParameterKind::MultiSelect,
        }
    }

    pub fn common(&self) -> &ParameterCommon {
        match self {
            ConfigurationParameter::ShortText(common)
            | ConfigurationParameter::LongText(common)
            | ConfigurationParameter::Boolean(common)
            | ConfigurationParameter::Encrypted(common)
            | ConfigurationParameter::Authentication { common, .. }
            | ConfigurationParameter::SingleSelect { common, .. }
            | ConfigurationParameter::MultiSelect { common, .. } => common,
        }
    }

    pub fn common_mut(&mut self) -> &mut ParameterCommon {
        match self {
            ConfigurationParameter::ShortText(common)
            | ConfigurationParameter::LongText(common)
            | ConfigurationParameter::Boolean(common)
            | ConfigurationParameter::Encrypted(common)
            | ConfigurationParameter::Authentication { common, .. }
            | ConfigurationParameter::SingleSelect { common, .. }
            | ConfigurationParameter::MultiSelect { common, .. } => common,
        }
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }

    /// Carries over from `previous` what a field set cannot express: unmodelled keys,
    /// whether flags were listed, and the YAML type of an unchanged default.
    pub(crate) fn inherit(&mut self, previous: &ConfigurationParameter) {
        let before = previous.common();
        let common = self.common_mut();
        common.extra = before.extra.clone();
        common.required = before.required.updated(common.required.get());
        common.default_value = common
            .default_value
            .take()
            .map(|value| value.keep_type_of(before.default_value.as_ref()));
        if let (
            ConfigurationParameter::Authentication {
                hidden_username, ..
            },
            ConfigurationParameter::Authentication {
                hidden_username: was_hidden,
                ..
            },
        ) = (self, previous)
        {
            *hidden_username = was_hidden.updated(hidden_username.get());
        }
    }

    /// The option list of select kinds, empty for every other kind.
    pub fn options(&self) -> &[String] {
        match self {
            ConfigurationParameter::SingleSelect { options, .. }
            | ConfigurationParameter::MultiSelect { options, .. } => options,
            _ => &[],
        }
    }
}

/// The flat on-disk form of a configuration parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawParameter {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    display: String,
    #[serde(rename = "type")]
    kind: i64,
    #[serde(default, skip_serializing_if = "Flag::is_unset")]
    required: Flag,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_scalar_opt"
    )]
    defaultvalue: Option<Scalar>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_text_opt"
    )]
    additionalinfo: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_text_opt"
    )]
    displaypassword: Option<String>,
    #[serde(default, skip_serializing_if = "Flag::is_unset")]
    hiddenusername: Flag,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_text_or_list"
    )]
    options: Option<Vec<String>>,
    #[serde(flatten)]
    extra: Mapping,
}

impl TryFrom<RawParameter> for ConfigurationParameter {
    type Error = ModelError;

    fn try_from(raw: RawParameter) -> Result<Self, Self::Error> {
        let kind = ParameterKind::from_discriminant(raw.kind).ok_or_else(|| {
            ModelError::UnknownKind {
                discriminant: raw.kind.to_string(),
            }
        })?;
        let common = ParameterCommon {
            name: raw.name,
            display: raw.display,
            required: raw.required,
            default_value: raw.defaultvalue,
            additional_info: raw.additionalinfo,
            extra: raw.extra,
        };
        let options = raw.options.unwrap_or_default();
        Ok(match kind {
            ParameterKind::ShortText => ConfigurationParameter::ShortText(common),
            ParameterKind::LongText => ConfigurationParameter::LongText(common),
            ParameterKind::Boolean => ConfigurationParameter::Boolean(common),
            ParameterKind::Encrypted => ConfigurationParameter::Encrypted(common),
            ParameterKind::Authentication => ConfigurationParameter::Authentication {
                common,
                display_password: raw.displaypassword.unwrap_or_default(),
                hidden_username: raw.hiddenusername,
            },
            ParameterKind::SingleSelect => ConfigurationParameter::SingleSelect { common, options },
            ParameterKind::MultiSelect => ConfigurationParameter::MultiSelect { common, options },
        })
    }
}

impl From<ConfigurationParameter> for RawParameter {
    fn from(parameter: ConfigurationParameter) -> Self {
        let kind = parameter.kind().discriminant();
        let (common, displaypassword, hiddenusername, options) = match parameter {
            ConfigurationParameter::ShortText(common)
            | ConfigurationParameter::LongText(common)
            | ConfigurationParameter::Boolean(common)
            | ConfigurationParameter::Encrypted(common) => {
                (common, None, Flag::default(), None)
            }
            ConfigurationParameter::Authentication {
                common,
                display_password,
                hidden_username,
            } => (
                common,
                Some(display_password).filter(|s| !s.is_empty()),
                hidden_username,
                None,
            ),
            ConfigurationParameter::SingleSelect { common, options }
            | ConfigurationParameter::MultiSelect { common, options } => {
                (common, None, Flag::default(), Some(options))
            }
        };
        RawParameter {
            name: common.name,
            display: common.display,
            kind,
            required: common.required,
            defaultvalue: common.default_value,
            additionalinfo: common.additional_info,
            displaypassword,
            hiddenusername,
            options,
            extra: common.extra,
        }
    }
}
