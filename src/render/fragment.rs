use crate::codec::{FieldBag, FieldInput, escape_markup};
use crate::registry::ChangeHook;
use serde_json::{Map, Value, json};

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &["input", "br", "hr", "meta"];

/// Attribute marking the root of an independently replaceable fragment.
pub const FRAGMENT_ATTR: &str = "data-fragment";
/// Attribute naming the field a form control feeds.
pub const FIELD_ATTR: &str = "data-field";

/// A node of a fragment tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// A markup element. Attribute values and text are stored raw and escaped on serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Adds a boolean attribute when `on` is set.
    pub fn flag(self, name: &'static str, on: bool) -> Self {
        if on { self.attr(name, name) } else { self }
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| *key == name)
    }

    /// Concatenated text content of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => out.push_str(&element.text_content()),
            }
        }
        out
    }

    /// Finds the first descendant (or self) with the given id.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Element(element) => element.find_by_id(id),
            Node::Text(_) => None,
        })
    }

    /// Visits self and every descendant element, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in &self.children {
            if let Node::Element(element) = child {
                element.walk(visit);
            }
        }
    }

    /// Visits self and descendants, not descending into nested fragments.
    fn walk_own<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in &self.children {
            if let Node::Element(element) = child {
                if !element.has_attr(FRAGMENT_ATTR) {
                    element.walk_own(visit);
                }
            }
        }
    }

    /// Reads every form control that belongs to this fragment, the way the display host
    /// collects them when packaging a change.
    pub fn form_values(&self) -> FieldBag {
        let mut values = FieldBag::new();
        self.walk_own(&mut |element| {
            if let Some(field) = element.get_attr(FIELD_ATTR) {
                values.insert(field, element.control_value());
            }
        });
        values
    }

    fn control_value(&self) -> FieldInput {
        match self.tag {
            "input" if self.get_attr("type") == Some("checkbox") => {
                FieldInput::Flag(self.has_attr("checked"))
            }
            "textarea" => {
                let text = self.text_content();
                match text.strip_prefix('\n') {
                    Some(rest) => FieldInput::Text(rest.to_string()),
                    None => FieldInput::Text(text),
                }
            }
            "select" => {
                let options: Vec<&Element> = self
                    .children
                    .iter()
                    .filter_map(|child| match child {
                        Node::Element(e) if e.tag == "option" => Some(e),
                        _ => None,
                    })
                    .collect();
                let value_of = |option: &Element| {
                    option
                        .get_attr("value")
                        .map_or_else(|| option.text_content(), str::to_string)
                };
                let selected: Vec<String> = options
                    .iter()
                    .filter(|o| o.has_attr("selected"))
                    .map(|o| value_of(o))
                    .collect();
                if self.has_attr("multiple") {
                    FieldInput::List(selected)
                } else {
                    let first = selected
                        .into_iter()
                        .next()
                        .or_else(|| options.first().map(|o| value_of(o)));
                    FieldInput::Text(first.unwrap_or_default())
                }
            }
            _ => FieldInput::Text(self.get_attr("value").unwrap_or_default().to_string()),
        }
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_markup(value));
            out.push('"');
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(&escape_markup(text)),
                Node::Element(element) => element.write_markup(out),
            }
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

/// Positional address of a fragment, carried by every message it emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coordinates {
    pub configuration_index: Option<usize>,
    pub command_index: Option<usize>,
    pub index: Option<usize>,
}

impl Coordinates {
    pub fn configuration(index: usize) -> Self {
        Self {
            configuration_index: Some(index),
            ..Self::default()
        }
    }

    pub fn command(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }

    pub fn scoped(command_index: Option<usize>, index: Option<usize>) -> Self {
        Self {
            command_index,
            index,
            ..Self::default()
        }
    }

    /// Writes the present coordinates into a message object using protocol key names.
    pub fn write_into(&self, message: &mut Map<String, Value>) {
        if let Some(i) = self.configuration_index {
            message.insert("configurationIndex".to_string(), json!(i));
        }
        if let Some(i) = self.command_index {
            message.insert("commandIndex".to_string(), json!(i));
        }
        if let Some(i) = self.index {
            message.insert("index".to_string(), json!(i));
        }
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.write_into(&mut map);
        Value::Object(map)
    }
}

/// How a fragment reports edits and removal back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBinding {
    /// Message sent with the full field set on any field change.
    pub update: &'static str,
    /// Message sent, with coordinates only, by the remove control.
    pub remove: Option<&'static str>,
    pub coordinates: Coordinates,
    pub hook: Option<ChangeHook>,
}

impl ChangeBinding {
    pub fn new(update: &'static str, coordinates: Coordinates) -> Self {
        Self {
            update,
            remove: None,
            coordinates,
            hook: None,
        }
    }

    pub fn removable(mut self, remove: &'static str) -> Self {
        self.remove = Some(remove);
        self
    }

    pub fn with_hook(mut self, hook: ChangeHook) -> Self {
        self.hook = Some(hook);
        self
    }
}

/// One independently replaceable piece of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub id: String,
    pub root: Element,
    pub binding: Option<ChangeBinding>,
}

impl Fragment {
    /// Wraps `root`, stamping it with the fragment id, kind and change wiring.
    pub fn new(id: String, kind: &str, root: Element, binding: Option<ChangeBinding>) -> Self {
        let mut stamped = Element::new(root.tag)
            .id(id.clone())
            .attr(FRAGMENT_ATTR, kind);
        if let Some(binding) = &binding {
            stamped = stamped
                .attr("data-on-change", binding.update)
                .attr("data-coords", binding.coordinates.to_json().to_string());
            if let Some(remove) = binding.remove {
                stamped = stamped.attr("data-on-remove", remove);
            }
            if let Some(hook) = binding.hook {
                stamped = stamped.attr("data-hook", hook.name());
            }
        }
        stamped.attrs.extend(root.attrs);
        stamped.children = root.children;
        Self {
            id,
            root: stamped,
            binding,
        }
    }

    pub fn to_markup(&self) -> String {
        self.root.to_markup()
    }

    /// The message the display host emits after the user applies `edits` to this
    /// fragment: every field of the fragment, with the edits overlaid and any per-kind
    /// hook applied, plus the fragment's coordinates.
    pub fn change_message(&self, edits: FieldBag) -> Option<Value> {
        let binding = self.binding.as_ref()?;
        let changed: Vec<String> = edits.keys().into_iter().map(str::to_string).collect();
        let mut fields = self.root.form_values();
        fields.merge(edits);
        if let Some(hook) = binding.hook {
            for field in &changed {
                hook.apply(field, &mut fields);
            }
        }
        let mut message = Map::new();
        message.insert("command".to_string(), json!(binding.update));
        binding.coordinates.write_into(&mut message);
        message.insert("data".to_string(), serde_json::to_value(&fields).ok()?);
        Some(Value::Object(message))
    }

    /// The message emitted by this fragment's remove control.
    pub fn remove_message(&self) -> Option<Value> {
        let binding = self.binding.as_ref()?;
        let mut message = Map::new();
        message.insert("command".to_string(), json!(binding.remove?));
        binding.coordinates.write_into(&mut message);
        Some(Value::Object(message))
    }
}
