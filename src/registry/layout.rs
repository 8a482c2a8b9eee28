use super::{ChangeHook, ParameterKind};
use crate::codec::{ElementKind, FieldValue, make_id};
use crate::model::{ConfigurationParameter, ParameterCommon};
use crate::render::controls::{self, Form};
use crate::render::{ChangeBinding, Coordinates, Fragment};

fn kind_options() -> impl Iterator<Item = (String, String)> {
    ParameterKind::ALL
        .iter()
        .map(|kind| (kind.discriminant().to_string(), kind.label().to_string()))
}

fn common_fields(form: Form, common: &ParameterCommon, kind: ParameterKind) -> Form {
    form.field("name", "Name", controls::text(&common.name))
        .field(
            "type",
            "Type",
            controls::select(kind_options(), &[kind.discriminant().to_string()], false),
        )
        .field("required", "Required", controls::checkbox(common.required.get()))
        .field(
            "additionalinfo",
            "Additional info",
            controls::textarea(&FieldValue::Text(
                common.additional_info.clone().unwrap_or_default(),
            )),
        )
}

fn default_value(common: &ParameterCommon) -> &str {
    common.default_value.as_deref().unwrap_or_default()
}

/// Renders one configuration parameter with the layout of its kind.
pub fn render(parameter: &ConfigurationParameter, index: usize) -> Fragment {
    let kind = parameter.kind();
    let common = parameter.common();
    let mut form = common_fields(Form::new(ElementKind::Configuration, &[index]), common, kind);
    let mut binding = ChangeBinding::new("updateConfiguration", Coordinates::configuration(index))
        .removable("removeConfiguration");

    form = match parameter {
        ConfigurationParameter::ShortText(_) => form
            .field("display", "Display name", controls::text(&common.display))
            .field("defaultvalue", "Default value", controls::text(default_value(common))),
        ConfigurationParameter::LongText(_) => form
            .field("display", "Display name", controls::text(&common.display))
            .field(
                "defaultvalue",
                "Default value",
                controls::textarea(&FieldValue::Text(default_value(common).to_string())),
            ),
        ConfigurationParameter::Encrypted(_) => form
            .field("display", "Display name", controls::text(&common.display))
            .field("defaultvalue", "Default value", controls::secret(default_value(common))),
        ConfigurationParameter::Boolean(_) => {
            let choices = ["", "true", "false"]
                .into_iter()
                .map(|v| (v.to_string(), v.to_string()));
            form.field("display", "Display name", controls::text(&common.display))
                .field(
                    "defaultvalue",
                    "Default value",
                    controls::select(choices, &[default_value(common).to_string()], false),
                )
        }
        ConfigurationParameter::Authentication {
            display_password,
            hidden_username,
            ..
        } => {
            binding = binding.with_hook(ChangeHook::AuthenticationToggles);
            let display_id = form.field_id("display");
            let password_id = form.field_id("displaypassword");
            form.field(
                "showusername",
                "Show username",
                controls::checkbox(!hidden_username.get()).attr("data-controls", display_id),
            )
            .field(
                "display",
                "Username label",
                controls::text(&common.display).flag("disabled", hidden_username.get()),
            )
            .field(
                "showpassword",
                "Show password",
                controls::checkbox(!display_password.is_empty())
                    .attr("data-controls", password_id),
            )
            .field(
                "displaypassword",
                "Password label",
                controls::text(display_password).flag("disabled", display_password.is_empty()),
            )
        }
        ConfigurationParameter::SingleSelect { options, .. } => form
            .field("display", "Display name", controls::text(&common.display))
            .field(
                "options",
                "Options",
                controls::textarea(&FieldValue::List(options.clone())),
            )
            .field(
                "defaultvalue",
                "Default value",
                controls::select(
                    std::iter::once((String::new(), String::new()))
                        .chain(options.iter().map(|o| (o.clone(), o.clone()))),
                    &[default_value(common).to_string()],
                    false,
                ),
            ),
        ConfigurationParameter::MultiSelect { options, .. } => {
            let selected: Vec<String> = default_value(common)
                .split(',')
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            form.field("display", "Display name", controls::text(&common.display))
                .field(
                    "options",
                    "Options",
                    controls::textarea(&FieldValue::List(options.clone())),
                )
                .field(
                    "defaultvalue",
                    "Default value",
                    controls::select(
                        options.iter().map(|o| (o.clone(), o.clone())),
                        &selected,
                        true,
                    ),
                )
        }
    };

    Fragment::new(
        make_id(ElementKind::Configuration, &[index]),
        "configuration",
        form.remove_button("Remove parameter").finish(),
        Some(binding),
    )
}
