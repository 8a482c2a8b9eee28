//! Document model tests: loading, collection edits and round-tripping.
mod common;
use common::*;
use henshu::codec::FieldBag;
use henshu::error::{LoadError, ModelError};
use henshu::model::{Collection, Document, DocumentKind, OutputType, Scope};
use henshu::registry::ParameterKind;
use pretty_assertions::assert_eq;
use std::fs;

fn argument(name: &str) -> FieldBag {
    FieldBag::new()
        .with("name", name)
        .with("description", "d")
        .with("required", true)
        .with("isArray", false)
        .with("defaultValue", "")
}

fn output(path: &str) -> FieldBag {
    FieldBag::new()
        .with("contextPath", path)
        .with("description", "")
        .with("type", "Unknown")
}

fn command(name: &str) -> FieldBag {
    FieldBag::new()
        .with("name", name)
        .with("description", "")
        .with("deprecated", false)
}

fn parameter(name: &str, kind: ParameterKind) -> FieldBag {
    FieldBag::new()
        .with("name", name)
        .with("display", name)
        .with("type", kind.discriminant())
}

/// Listed-false flags, typed defaults, and no optional keys anywhere else.
const SPARSE_YAML: &str = r#"
commonfields:
  id: sparse
name: sparse
configuration:
- name: verify
  type: 8
  required: false
  defaultvalue: true
- name: credentials
  type: 9
  hiddenusername: false
- name: limit
  type: 0
  defaultvalue: 50
script:
  commands:
  - name: run
    arguments:
    - name: count
      isArray: false
      defaultValue: 10
"#;

fn yaml_at(text: &str, key: &str) -> serde_yaml::Value {
    let value: serde_yaml::Value = serde_yaml::from_str(text).unwrap();
    value[key].clone()
}

#[cfg(test)]
mod load_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_integration_is_detected_by_script_mapping() {
        let document = integration();
        assert_eq!(document.kind(), DocumentKind::Integration);
        assert_eq!(document.name(), "sample-integration");
        assert_eq!(document.id(), "sample-integration");
        assert_eq!(document.commands().len(), 1);
        assert_eq!(document.commands()[0].name, "test-command");
        assert!(document.commands()[0].arguments.is_empty());
        assert_eq!(document.configuration()[0].kind(), ParameterKind::ShortText);
    }

    #[test]
    fn test_automation_loads_flat_lists() {
        let document = automation();
        assert_eq!(document.kind(), DocumentKind::Automation);
        assert_eq!(document.description(), "Does something useful.");
        let arguments = document.arguments(Scope::Root).unwrap();
        assert_eq!(arguments.len(), 2);
        assert_eq!(
            arguments[1].predefined,
            Some(vec!["fast".to_string(), "slow".to_string()])
        );
        let outputs = document.outputs(Scope::Root).unwrap();
        assert_eq!(outputs[0].output_type, OutputType::String);
        assert!(document.commands().is_empty());
    }

    #[test]
    fn test_missing_required_fields_fail_to_load() {
        let no_id = "name: x\ncommonfields: {}\n";
        assert!(matches!(
            Document::from_yaml_str(no_id),
            Err(LoadError::MissingField("commonfields.id"))
        ));

        let no_name = "commonfields:\n  id: x\n";
        assert!(matches!(
            Document::from_yaml_str(no_name),
            Err(LoadError::MissingField("name"))
        ));

        let no_script = "commonfields:\n  id: x\nname: x\nconfiguration: []\n";
        assert!(matches!(
            Document::from_yaml_str(no_script),
            Err(LoadError::MissingField("script"))
        ));
    }

    #[test]
    fn test_unknown_parameter_kind_fails_to_load() {
        let yaml = "commonfields:\n  id: x\nname: x\nconfiguration:\n- name: p\n  type: 999\nscript: {}\n";
        assert!(matches!(Document::from_yaml_str(yaml), Err(LoadError::Yaml(_))));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Document::from_file(dir.path().join("absent.yml"));
        assert!(matches!(result, Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_round_trip_preserves_unmodelled_keys() {
        let document = integration();
        let text = document.to_yaml_string().unwrap();
        assert!(text.contains("section: Connect"));
        assert!(text.contains("subtype: python3"));
        assert_eq!(Document::from_yaml_str(&text).unwrap(), document);

        let document = automation();
        let text = document.to_yaml_string().unwrap();
        assert!(text.contains("tags:"));
        assert!(!text.contains("configuration"));
        assert_eq!(Document::from_yaml_str(&text).unwrap(), document);
    }

    #[test]
    fn test_round_trip_keeps_listed_flags_and_scalar_types() {
        let document = Document::from_yaml_str(SPARSE_YAML).unwrap();
        let text = document.to_yaml_string().unwrap();
        assert_eq!(
            yaml_at(&text, "configuration"),
            yaml_at(SPARSE_YAML, "configuration")
        );
        assert_eq!(yaml_at(&text, "script"), yaml_at(SPARSE_YAML, "script"));
    }

    #[test]
    fn test_save_adds_no_keys_the_source_lacked() {
        let mut document = Document::from_yaml_str(SPARSE_YAML).unwrap();
        document.update_advanced(&FieldBag::new().with("longRunning", false));
        let text = document.to_yaml_string().unwrap();
        for key in ["longRunning", "display", "description", "deprecated", "required: true"] {
            assert!(!text.contains(key), "unexpected {} in:\n{}", key, text);
        }
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kinds.yml");
        fs::write(&path, ALL_KINDS_YAML).unwrap();
        let document = Document::from_file(&path).unwrap();
        fs::write(&path, document.to_yaml_string().unwrap()).unwrap();
        assert_eq!(Document::from_file(&path).unwrap(), document);
    }
}

#[cfg(test)]
mod collection_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_then_remove_restores_every_collection() {
        let mut document = integration();
        let before = document.clone();

        let index = document.add_command(&command("extra")).unwrap();
        document.remove_command(index).unwrap();
        assert_eq!(document, before);

        let index = document
            .add_configuration(&parameter("p", ParameterKind::Boolean))
            .unwrap();
        document.remove_configuration(index).unwrap();
        assert_eq!(document, before);

        let scope = Scope::Command(0);
        let index = document.add_argument(scope, None, &argument("a")).unwrap();
        document.remove_argument(scope, index).unwrap();
        let index = document.add_output(scope, None, &output("A.B")).unwrap();
        document.remove_output(scope, index).unwrap();
        assert_eq!(document, before);
    }

    #[test]
    fn test_insert_at_position_then_remove_restores() {
        let mut document = automation();
        let before = document.clone();
        let index = document
            .add_argument(Scope::Root, Some(0), &argument("first"))
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(document.arguments(Scope::Root).unwrap()[0].name, "first");
        assert_eq!(document.arguments(Scope::Root).unwrap()[1].name, "value");
        document.remove_argument(Scope::Root, 0).unwrap();
        assert_eq!(document, before);

        let err = document
            .add_argument(Scope::Root, Some(5), &argument("far"))
            .unwrap_err();
        assert!(matches!(err, ModelError::IndexOutOfRange { index: 5, len: 2, .. }));
    }

    #[test]
    fn test_remove_shifts_only_later_elements() {
        let mut document = integration();
        for name in ["b", "c", "d"] {
            document.add_command(&command(name)).unwrap();
        }
        let names = |d: &Document| d.commands().iter().map(|c| c.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&document), vec!["test-command", "b", "c", "d"]);

        let removed = document.remove_command(1).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(names(&document), vec!["test-command", "c", "d"]);
    }

    #[test]
    fn test_out_of_range_leaves_document_untouched() {
        let mut document = integration();
        let before = document.clone();
        assert!(matches!(
            document.remove_command(3),
            Err(ModelError::IndexOutOfRange { collection: "commands", index: 3, len: 1 })
        ));
        assert!(document.update_configuration(9, &parameter("p", ParameterKind::ShortText)).is_err());
        assert!(document.remove_argument(Scope::Command(4), 0).is_err());
        assert_eq!(document, before);
    }

    #[test]
    fn test_unknown_kind_leaves_configuration_unmodified() {
        let mut document = integration();
        let before = document.configuration().to_vec();
        let fields = FieldBag::new().with("name", "p").with("type", 999i64);
        assert_eq!(
            document.add_configuration(&fields),
            Err(ModelError::UnknownKind { discriminant: "999".to_string() })
        );
        assert_eq!(document.update_configuration(0, &fields).map(|_| ()), Err(ModelError::UnknownKind { discriminant: "999".to_string() }));
        assert_eq!(document.configuration(), before.as_slice());
    }

    #[test]
    fn test_scope_must_match_document_kind() {
        let mut integration = integration();
        assert!(matches!(
            integration.add_argument(Scope::Root, None, &argument("a")),
            Err(ModelError::ScopeMismatch { collection: "arguments", .. })
        ));

        let mut automation = automation();
        assert!(matches!(
            automation.add_output(Scope::Command(0), None, &output("X")),
            Err(ModelError::ScopeMismatch { collection: "outputs", .. })
        ));
        assert!(matches!(
            automation.add_command(&command("c")),
            Err(ModelError::ScopeMismatch { .. })
        ));
        assert_eq!(automation.len_of(Collection::Commands), Ok(0));
    }

    #[test]
    fn test_update_configuration_can_change_kind_and_keeps_unmodelled_keys() {
        let mut document = integration();
        let fields = parameter("url", ParameterKind::SingleSelect).with("options", "x\ny");
        let previous = document.update_configuration(0, &fields).unwrap();
        assert_eq!(previous.kind(), ParameterKind::ShortText);

        let current = &document.configuration()[0];
        assert_eq!(current.kind(), ParameterKind::SingleSelect);
        assert_eq!(current.options(), ["x", "y"]);
        assert_eq!(
            current.common().extra.get("section").and_then(|v| v.as_str()),
            Some("Connect")
        );
    }

    #[test]
    fn test_edits_keep_listed_flags_and_scalar_types() {
        let mut document = Document::from_yaml_str(SPARSE_YAML).unwrap();
        let flag = parameter("verify", ParameterKind::Boolean)
            .with("required", false)
            .with("defaultvalue", "false");
        document.update_configuration(0, &flag).unwrap();
        let limit = parameter("limit", ParameterKind::ShortText)
            .with("required", false)
            .with("defaultvalue", "50");
        document.update_configuration(2, &limit).unwrap();
        let count = argument("count")
            .with("required", false)
            .with("defaultValue", "12");
        document.update_argument(Scope::Command(0), 0, &count).unwrap();

        let text = document.to_yaml_string().unwrap();
        let configuration = yaml_at(&text, "configuration");
        assert_eq!(configuration[0]["required"], serde_yaml::Value::Bool(false));
        assert_eq!(configuration[0]["defaultvalue"], serde_yaml::Value::Bool(false));
        assert_eq!(configuration[2]["defaultvalue"], serde_yaml::Value::from(50));
        assert!(configuration[2].get("required").is_none());

        let script = yaml_at(&text, "script");
        let saved = &script["commands"][0]["arguments"][0];
        assert_eq!(saved["defaultValue"], serde_yaml::Value::from(12));
        assert_eq!(saved["isArray"], serde_yaml::Value::Bool(false));
        assert!(saved.get("required").is_none());
    }

    #[test]
    fn test_update_command_keeps_arguments_and_outputs() {
        let mut document = integration();
        let scope = Scope::Command(0);
        document.add_argument(scope, None, &argument("a")).unwrap();
        document.add_output(scope, None, &output("A.B")).unwrap();

        document
            .update_command(0, &command("renamed").with("deprecated", true))
            .unwrap();
        let updated = &document.commands()[0];
        assert_eq!(updated.name, "renamed");
        assert!(updated.deprecated.get());
        assert_eq!(updated.arguments.len(), 1);
        assert_eq!(updated.outputs.len(), 1);
    }

    #[test]
    fn test_predefined_values_are_normalized_to_a_list() {
        let mut document = automation();
        let index = document
            .add_argument(Scope::Root, None, &argument("p").with("predefined", "a\nb\nc"))
            .unwrap();
        assert_eq!(
            document.arguments(Scope::Root).unwrap()[index].predefined,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );

        document
            .update_argument(Scope::Root, index, &argument("p").with("predefined", vec!["a", "b"]))
            .unwrap();
        assert_eq!(
            document.arguments(Scope::Root).unwrap()[index].predefined,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_output_type_is_case_insensitive_and_validated() {
        let mut document = automation();
        document
            .update_output(Scope::Root, 0, &output("Sample.Result").with("type", "number"))
            .unwrap();
        assert_eq!(
            document.outputs(Scope::Root).unwrap()[0].output_type,
            OutputType::Number
        );
        let err = document
            .update_output(Scope::Root, 0, &output("Sample.Result").with("type", "Blob"))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidField { .. }));
        assert_eq!(
            document.outputs(Scope::Root).unwrap()[0].output_type,
            OutputType::Number
        );
    }
}

#[cfg(test)]
mod section_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_long_running_port_is_dropped_without_long_running() {
        let mut document = integration();
        let fields = FieldBag::new()
            .with("dockerImage", "x")
            .with("longRunning", false)
            .with("longRunningPort", true);
        document.update_advanced(&fields);
        let settings = document.advanced();
        assert_eq!(settings.docker_image.as_deref(), Some("x"));
        assert!(!settings.long_running);
        assert_eq!(settings.long_running_port, None);
        assert!(!document.to_yaml_string().unwrap().contains("longRunningPort"));
    }

    #[test]
    fn test_long_running_port_is_kept_with_long_running() {
        let mut document = integration();
        document.update_advanced(
            &FieldBag::new()
                .with("dockerimage", "img")
                .with("longRunning", true)
                .with("longRunningPort", true),
        );
        assert_eq!(document.advanced().long_running_port, Some(true));
    }

    #[test]
    fn test_automation_ignores_long_running() {
        let mut document = automation();
        document.update_advanced(&FieldBag::new().with("dockerimage", "img").with("longRunning", true));
        let settings = document.advanced();
        assert_eq!(settings.docker_image.as_deref(), Some("img"));
        assert!(!settings.long_running);
    }

    #[test]
    fn test_update_basic_touches_only_present_keys() {
        let mut document = integration();
        document.update_basic(&FieldBag::new().with("display", "Renamed").with("isfetch", true));
        match &document {
            Document::Integration(i) => {
                assert_eq!(i.display, "Renamed");
                assert_eq!(i.name, "sample-integration");
                assert_eq!(i.category.as_deref(), Some("Utilities"));
                assert_eq!(i.script.isfetch, Some(true));
            }
            Document::Automation(_) => panic!("expected an integration"),
        }

        document.update_basic(&FieldBag::new().with("category", ""));
        assert!(matches!(&document, Document::Integration(i) if i.category.is_none()));

        let mut document = automation();
        document.update_basic(&FieldBag::new().with("description", "New comment"));
        assert_eq!(document.description(), "New comment");
    }
}
