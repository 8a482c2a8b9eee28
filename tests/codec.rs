//! Field codec tests: display round-trips, field bag reads and element ids.
use henshu::codec::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[cfg(test)]
mod codec_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_round_trip_per_field_kind() {
        let values = [
            FieldValue::Flag(true),
            FieldValue::Flag(false),
            FieldValue::Text("plain <text> & \"quotes\"".to_string()),
            FieldValue::Text(String::new()),
            FieldValue::List(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
            FieldValue::List(Vec::new()),
        ];
        for value in values {
            let token = encode_for_display(&value);
            let decoded = decode_from_display(&token.to_input(), value.kind());
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_list_is_shown_one_item_per_line() {
        let token = encode_for_display(&FieldValue::List(vec!["x".into(), "y".into()]));
        assert_eq!(token, DisplayToken::Multiline("x\ny".to_string()));
    }

    #[test]
    fn test_flag_decodes_from_text_and_number() {
        for raw in ["true", "on", "Yes", "1"] {
            assert_eq!(
                decode_from_display(&FieldInput::from(raw), FieldKind::Flag),
                FieldValue::Flag(true)
            );
        }
        assert_eq!(
            decode_from_display(&FieldInput::from("off"), FieldKind::Flag),
            FieldValue::Flag(false)
        );
        assert_eq!(
            decode_from_display(&FieldInput::Number(0), FieldKind::Flag),
            FieldValue::Flag(false)
        );
    }

    #[test]
    fn test_list_decoding_normalizes_text_and_keeps_lists() {
        assert_eq!(
            decode_from_display(&FieldInput::from("a\nb\nc"), FieldKind::List),
            FieldValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(
            decode_from_display(&FieldInput::from(vec!["a", "b"]), FieldKind::List),
            FieldValue::List(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_field_bag_reads_json_payload() {
        let bag: FieldBag = serde_json::from_value(json!({
            "name": "p",
            "type": 15,
            "required": false,
            "options": ["a", "b"],
            "notes": "one\n\ntwo",
        }))
        .expect("payload decodes");

        assert_eq!(bag.len(), 5);
        assert_eq!(bag.keys(), vec!["name", "notes", "options", "required", "type"]);
        assert_eq!(bag.text("name").as_deref(), Some("p"));
        assert_eq!(bag.number("type"), Some(15));
        assert_eq!(bag.text("type").as_deref(), Some("15"));
        assert_eq!(bag.flag("required"), Some(false));
        assert_eq!(bag.list("options"), Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(bag.list("notes"), Some(vec!["one".to_string(), "two".to_string()]));
        assert_eq!(bag.flag("missing"), None);
        assert_eq!(bag.non_empty_text("missing"), None);
    }

    #[test]
    fn test_field_bag_drops_null_values() {
        let bag: FieldBag =
            serde_json::from_value(json!({ "name": "x", "defaultValue": null })).unwrap();
        assert_eq!(bag.len(), 1);
        assert!(!bag.contains("defaultValue"));
        assert_eq!(bag.text("name").as_deref(), Some("x"));
    }

    #[test]
    fn test_merge_overlays_fields() {
        let mut bag = FieldBag::new().with("a", "1").with("b", true);
        bag.merge(FieldBag::new().with("b", false).with("c", 3i64));
        assert_eq!(bag.flag("b"), Some(false));
        assert_eq!(bag.number("c"), Some(3));
        assert_eq!(bag.text("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_element_ids() {
        assert_eq!(make_id(ElementKind::Basic, &[]), "basic");
        assert_eq!(make_id(ElementKind::Configuration, &[3]), "configuration-3");
        assert_eq!(make_id(ElementKind::CommandArgument, &[1, 2]), "command-argument-1-2");
        assert_eq!(
            make_id(ElementKind::CommandOutputList, &[0]),
            "command-output-list-0"
        );
        assert_eq!(
            make_field_id(ElementKind::Argument, &[4], "isArray"),
            "argument-4--isArray"
        );
    }

    #[test]
    fn test_escape_markup_covers_quotes() {
        assert_eq!(escape_markup(r#"'a' "b""#), "&#39;a&#39; &quot;b&quot;");
    }
}
