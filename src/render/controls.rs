//! Form control builders. Values pass through the field codec before they land in the tree.

use super::fragment::{Element, FIELD_ATTR};
use crate::codec::{DisplayToken, ElementKind, FieldValue, encode_for_display, make_field_id};
use serde_json::Value;

fn with_token(element: Element, token: DisplayToken) -> Element {
    match token {
        DisplayToken::Checked(checked) => element.flag("checked", checked),
        DisplayToken::Text(text) => element.attr("value", text),
        DisplayToken::Multiline(text) => element.child(text),
    }
}

pub fn text(value: &str) -> Element {
    with_token(
        Element::new("input").attr("type", "text"),
        encode_for_display(&FieldValue::Text(value.to_string())),
    )
}

pub fn secret(value: &str) -> Element {
    with_token(
        Element::new("input").attr("type", "password"),
        encode_for_display(&FieldValue::Text(value.to_string())),
    )
}

/// A multi-line control. List values are shown one item per line.
///
/// Markup parsers drop a newline directly after `<textarea>`, so text that starts with
/// one gets a second.
pub fn textarea(value: &FieldValue) -> Element {
    let token = match encode_for_display(value) {
        DisplayToken::Text(text) | DisplayToken::Multiline(text) if text.starts_with('\n') => {
            DisplayToken::Multiline(format!("\n{}", text))
        }
        DisplayToken::Text(text) => DisplayToken::Multiline(text),
        other => other,
    };
    with_token(Element::new("textarea"), token)
}

pub fn checkbox(checked: bool) -> Element {
    with_token(
        Element::new("input").attr("type", "checkbox"),
        encode_for_display(&FieldValue::Flag(checked)),
    )
}

/// A select over `(value, label)` pairs with the given values selected.
pub fn select<I>(options: I, selected: &[String], multiple: bool) -> Element
where
    I: IntoIterator<Item = (String, String)>,
{
    let options = options.into_iter().map(|(value, label)| {
        let is_selected = selected.contains(&value);
        Element::new("option")
            .attr("value", value)
            .flag("selected", is_selected)
            .child(label)
    });
    Element::new("select")
        .flag("multiple", multiple)
        .children(options)
}

pub fn button(action: &str, label: &str) -> Element {
    Element::new("button")
        .attr("type", "button")
        .attr("data-action", action)
        .child(label)
}

/// A control that sends a fixed message, used for add buttons outside any fragment.
pub fn message_button(label: &str, message: &Value) -> Element {
    button("send", label).attr("data-message", message.to_string())
}

/// Lays out the labelled controls of one fragment.
pub struct Form {
    kind: ElementKind,
    indices: Vec<usize>,
    body: Element,
}

impl Form {
    pub fn new(kind: ElementKind, indices: &[usize]) -> Self {
        Self {
            kind,
            indices: indices.to_vec(),
            body: Element::new("div").class(kind.prefix()),
        }
    }

    pub fn field_id(&self, field: &str) -> String {
        make_field_id(self.kind, &self.indices, field)
    }

    /// Adds `control` bound to `field`, with a label.
    pub fn field(mut self, field: &str, label: &str, control: Element) -> Self {
        let id = self.field_id(field);
        let row = Element::new("div")
            .class("field")
            .child(Element::new("label").attr("for", id.clone()).child(label))
            .child(control.id(id).attr(FIELD_ATTR, field));
        self.body = self.body.child(row);
        self
    }

    pub fn heading(mut self, text: &str) -> Self {
        self.body = self.body.child(Element::new("h3").child(text));
        self
    }

    pub fn push(mut self, element: Element) -> Self {
        self.body = self.body.child(element);
        self
    }

    pub fn remove_button(self, label: &str) -> Self {
        self.push(button("remove", label))
    }

    pub fn finish(self) -> Element {
        self.body
    }
}
