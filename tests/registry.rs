//! Variant registry tests: classification, construction and per-kind layouts.
mod common;
use common::*;
use henshu::codec::{FieldBag, FieldInput};
use henshu::error::ModelError;
use henshu::model::ConfigurationParameter;
use henshu::registry::{self, ChangeHook, ParameterKind, classify, construct};
use henshu::render::{Element, FIELD_ATTR};
use pretty_assertions::assert_eq;

fn defaults(kind: ParameterKind) -> FieldBag {
    FieldBag::new()
        .with("name", "param")
        .with("display", "Param")
        .with("type", kind.discriminant())
        .with("required", false)
}

fn field<'a>(root: &'a Element, name: &str) -> Option<&'a Element> {
    let mut found = None;
    root.walk(&mut |element| {
        if found.is_none() && element.get_attr(FIELD_ATTR) == Some(name) {
            found = Some(element);
        }
    });
    found
}

#[cfg(test)]
mod registry_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_discriminants_are_fixed() {
        let table: Vec<(ParameterKind, i64)> = ParameterKind::ALL
            .iter()
            .map(|k| (*k, k.discriminant()))
            .collect();
        assert_eq!(
            table,
            vec![
                (ParameterKind::ShortText, 0),
                (ParameterKind::Encrypted, 4),
                (ParameterKind::Boolean, 8),
                (ParameterKind::Authentication, 9),
                (ParameterKind::LongText, 12),
                (ParameterKind::SingleSelect, 15),
                (ParameterKind::MultiSelect, 16),
            ]
        );
    }

    #[test]
    fn test_classify_accepts_numbers_and_numeric_text() {
        assert_eq!(classify(&FieldInput::Number(15)), Ok(ParameterKind::SingleSelect));
        assert_eq!(classify(&FieldInput::from(" 9 ")), Ok(ParameterKind::Authentication));
    }

    #[test]
    fn test_classify_rejects_unknown_discriminant() {
        assert_eq!(
            classify(&FieldInput::Number(999)),
            Err(ModelError::UnknownKind {
                discriminant: "999".to_string()
            })
        );
        assert!(classify(&FieldInput::from("text")).is_err());
        assert!(classify(&FieldInput::Flag(true)).is_err());
    }

    #[test]
    fn test_every_kind_constructs_and_renders() {
        for (index, kind) in ParameterKind::ALL.iter().enumerate() {
            let parameter = construct(*kind, &defaults(*kind));
            assert_eq!(parameter.kind(), *kind);
            assert_eq!(parameter.name(), "param");

            let fragment = registry::render(&parameter, index);
            let markup = fragment.to_markup();
            let id = format!("configuration-{}", index);
            assert_eq!(fragment.id, id);
            assert!(markup.starts_with(&format!("<div id=\"{}\" data-fragment=\"configuration\"", id)));
            assert!(markup.ends_with("</div>"));
            assert!(markup.contains("data-on-change=\"updateConfiguration\""));
            assert!(markup.contains("data-on-remove=\"removeConfiguration\""));
            assert!(field(&fragment.root, "type").is_some(), "{:?} has no type selector", kind);
            assert!(field(&fragment.root, "name").is_some());
        }
    }

    #[test]
    fn test_rendering_is_idempotent() {
        for parameter in all_kinds().configuration() {
            assert_eq!(
                registry::render(parameter, 2).to_markup(),
                registry::render(parameter, 2).to_markup()
            );
        }
    }

    #[test]
    fn test_rendered_fields_read_back_as_the_same_parameter() {
        for parameter in all_kinds().configuration() {
            let fragment = registry::render(parameter, 0);
            let rebuilt = registry::construct_from_fields(&fragment.root.form_values())
                .expect("rendered type is a known kind");
            let mut expected = parameter.clone();
            expected.common_mut().extra = Default::default();
            assert_eq!(rebuilt, expected);
        }
    }

    #[test]
    fn test_select_kinds_split_options() {
        let fields = defaults(ParameterKind::SingleSelect).with("options", "a\nb\n\nc");
        let parameter = construct(ParameterKind::SingleSelect, &fields);
        assert_eq!(parameter.options(), ["a", "b", "c"]);

        let fields = defaults(ParameterKind::MultiSelect)
            .with("options", vec!["a", "b"])
            .with("defaultvalue", vec!["a", "b"]);
        let parameter = construct(ParameterKind::MultiSelect, &fields);
        assert_eq!(parameter.common().default_value.as_deref(), Some("a,b"));
    }

    #[test]
    fn test_non_select_kinds_have_no_options() {
        let parameter = construct(
            ParameterKind::ShortText,
            &defaults(ParameterKind::ShortText).with("options", "a\nb"),
        );
        assert!(parameter.options().is_empty());
        assert!(!ParameterKind::ShortText.has_options());
    }

    #[test]
    fn test_single_select_fragment_lists_options_with_blank_choice() {
        let fields = defaults(ParameterKind::SingleSelect).with("options", vec!["a", "b"]);
        let fragment = registry::render(&construct(ParameterKind::SingleSelect, &fields), 0);
        let select = field(&fragment.root, "defaultvalue").expect("default selector");
        let markup = select.to_markup();
        assert!(markup.contains("<option value=\"\" selected=\"selected\"></option>"));
        assert!(markup.contains("<option value=\"a\">a</option>"));
        assert!(markup.contains("<option value=\"b\">b</option>"));
    }

    #[test]
    fn test_multi_select_marks_default_values_selected() {
        let document = all_kinds();
        let parameter = &document.configuration()[6];
        let fragment = registry::render(parameter, 6);
        let values = fragment.root.form_values();
        assert_eq!(values.list("defaultvalue"), Some(vec!["a".to_string(), "c".to_string()]));
    }

    #[test]
    fn test_authentication_construction_and_toggles() {
        let fields = defaults(ParameterKind::Authentication)
            .with("showusername", false)
            .with("displaypassword", "Secret");
        let parameter = construct(ParameterKind::Authentication, &fields);
        match &parameter {
            ConfigurationParameter::Authentication {
                display_password,
                hidden_username,
                ..
            } => {
                assert_eq!(display_password, "Secret");
                assert!(hidden_username.get());
            }
            other => panic!("expected authentication, got {:?}", other),
        }

        let fragment = registry::render(&parameter, 1);
        let display = field(&fragment.root, "display").expect("username label");
        assert!(display.has_attr("disabled"));
        let toggle = field(&fragment.root, "showusername").expect("username toggle");
        assert_eq!(toggle.get_attr("data-controls"), Some("configuration-1--display"));
        assert!(fragment.to_markup().contains("data-hook=\"authentication\""));
    }

    #[test]
    fn test_password_toggle_rules() {
        let hook = ChangeHook::AuthenticationToggles;

        let mut fields = FieldBag::new()
            .with("showpassword", true)
            .with("displaypassword", "");
        assert_eq!(hook.apply("showpassword", &mut fields), vec![("displaypassword", true)]);
        assert_eq!(fields.text("displaypassword").as_deref(), Some(registry::PASSWORD_SENTINEL));

        let mut fields = FieldBag::new()
            .with("showpassword", false)
            .with("displaypassword", "Token");
        hook.apply("showpassword", &mut fields);
        assert_eq!(fields.text("displaypassword").as_deref(), Some(""));

        let mut fields = FieldBag::new()
            .with("showusername", false)
            .with("display", "User");
        assert_eq!(hook.apply("showusername", &mut fields), vec![("display", false)]);
        assert_eq!(fields.text("display").as_deref(), Some(""));
        assert_eq!(fields.flag("hiddenusername"), Some(true));

        let mut untouched = FieldBag::new().with("name", "x");
        assert!(hook.apply("name", &mut untouched).is_empty());
        assert_eq!(untouched.len(), 1);
    }
}
