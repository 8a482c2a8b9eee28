//! Renders entities and collections into independently replaceable fragments.
//!
//! Every entity fragment carries change wiring that reports its **whole** field set on
//! any change, plus a remove control for repeatable entities. Collection fragments are a
//! container holding one fragment per element, so a single element can be appended and a
//! whole collection replaced without touching anything around it.

pub mod controls;
mod fragment;

pub use fragment::{
    ChangeBinding, Coordinates, Element, FIELD_ATTR, FRAGMENT_ATTR, Fragment, Node,
};

use crate::codec::{ElementKind, FieldValue, make_id};
use crate::config::NewElementDefaults;
use crate::error::ModelError;
use crate::model::{
    Argument, Collection, Command, ConfigurationParameter, Document, DocumentKind, Output,
    OutputType, Scope,
};
use crate::registry::{self, ParameterKind};
use controls::Form;
use serde_json::{Map, Value, json};

/// A borrowed entity of any repeatable type.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Configuration(&'a ConfigurationParameter),
    Command(&'a Command),
    Argument(&'a Argument),
    Output(&'a Output),
}

/// The element kind and index coordinates of the container holding `collection`.
fn container_kind(collection: Collection) -> (ElementKind, Vec<usize>) {
    match collection {
        Collection::Configurations => (ElementKind::ConfigurationList, vec![]),
        Collection::Commands => (ElementKind::CommandList, vec![]),
        Collection::Arguments(Scope::Root) => (ElementKind::ArgumentList, vec![]),
        Collection::Arguments(Scope::Command(c)) => (ElementKind::CommandArgumentList, vec![c]),
        Collection::Outputs(Scope::Root) => (ElementKind::OutputList, vec![]),
        Collection::Outputs(Scope::Command(c)) => (ElementKind::CommandOutputList, vec![c]),
    }
}

/// Id of the container element of `collection`.
pub fn container_id(collection: Collection) -> String {
    let (kind, indices) = container_kind(collection);
    make_id(kind, &indices)
}

fn element_kind(collection: Collection, index: usize) -> (ElementKind, Vec<usize>) {
    match collection {
        Collection::Configurations => (ElementKind::Configuration, vec![index]),
        Collection::Commands => (ElementKind::Command, vec![index]),
        Collection::Arguments(Scope::Root) => (ElementKind::Argument, vec![index]),
        Collection::Arguments(Scope::Command(c)) => (ElementKind::CommandArgument, vec![c, index]),
        Collection::Outputs(Scope::Root) => (ElementKind::Output, vec![index]),
        Collection::Outputs(Scope::Command(c)) => (ElementKind::CommandOutput, vec![c, index]),
    }
}

/// Builds fragments for a document. Holds the values new elements start with.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    defaults: NewElementDefaults,
}

impl Renderer {
    pub fn new(defaults: NewElementDefaults) -> Self {
        Self { defaults }
    }

    /// Renders one element of a collection at its position.
    pub fn render_single(&self, scope: Scope, index: usize, entity: EntityRef<'_>) -> Fragment {
        match entity {
            EntityRef::Configuration(parameter) => registry::render(parameter, index),
            EntityRef::Command(command) => self.render_command(index, command),
            EntityRef::Argument(argument) => self.render_argument(scope, index, argument),
            EntityRef::Output(output) => self.render_output(scope, index, output),
        }
    }

    /// Renders the container of `collection` with one fragment per current element.
    pub fn render_collection(
        &self,
        collection: Collection,
        document: &Document,
    ) -> Result<Fragment, ModelError> {
        let fragments: Vec<Fragment> = match collection {
            Collection::Configurations => document
                .configuration()
                .iter()
                .enumerate()
                .map(|(i, p)| registry::render(p, i))
                .collect(),
            Collection::Commands => document
                .commands()
                .iter()
                .enumerate()
                .map(|(i, c)| self.render_command(i, c))
                .collect(),
            Collection::Arguments(scope) => self.argument_fragments(scope, document.arguments(scope)?),
            Collection::Outputs(scope) => self.output_fragments(scope, document.outputs(scope)?),
        };
        Ok(Self::container(collection, fragments))
    }

    fn container(collection: Collection, fragments: Vec<Fragment>) -> Fragment {
        let root = Element::new("div")
            .class("collection")
            .children(fragments.into_iter().map(|f| f.root));
        Fragment::new(container_id(collection), "collection", root, None)
    }

    fn argument_fragments(&self, scope: Scope, arguments: &[Argument]) -> Vec<Fragment> {
        arguments
            .iter()
            .enumerate()
            .map(|(i, a)| self.render_argument(scope, i, a))
            .collect()
    }

    fn output_fragments(&self, scope: Scope, outputs: &[Output]) -> Vec<Fragment> {
        outputs
            .iter()
            .enumerate()
            .map(|(i, o)| self.render_output(scope, i, o))
            .collect()
    }

    pub fn render_command(&self, index: usize, command: &Command) -> Fragment {
        let scope = Scope::Command(index);
        let arguments = Self::container(
            Collection::Arguments(scope),
            self.argument_fragments(scope, &command.arguments),
        );
        let outputs = Self::container(
            Collection::Outputs(scope),
            self.output_fragments(scope, &command.outputs),
        );
        let form = Form::new(ElementKind::Command, &[index])
            .field("name", "Name", controls::text(&command.name))
            .field(
                "description",
                "Description",
                controls::textarea(&FieldValue::Text(command.description.clone())),
            )
            .field("deprecated", "Deprecated", controls::checkbox(command.deprecated.get()))
            .remove_button("Remove command")
            .heading("Arguments")
            .push(arguments.root)
            .push(self.add_control(Collection::Arguments(scope)))
            .heading("Outputs")
            .push(outputs.root)
            .push(self.add_control(Collection::Outputs(scope)));
        Fragment::new(
            make_id(ElementKind::Command, &[index]),
            "command",
            form.finish(),
            Some(ChangeBinding::new("updateCommand", Coordinates::command(index)).removable("removeCommand")),
        )
    }

    pub fn render_argument(&self, scope: Scope, index: usize, argument: &Argument) -> Fragment {
        let (kind, indices) = element_kind(Collection::Arguments(scope), index);
        let form = Form::new(kind, &indices)
            .field("name", "Name", controls::text(&argument.name))
            .field(
                "description",
                "Description",
                controls::textarea(&FieldValue::Text(argument.description.clone())),
            )
            .field("required", "Required", controls::checkbox(argument.required.get()))
            .field("isArray", "Is array", controls::checkbox(argument.is_array.get()))
            .field(
                "defaultValue",
                "Default value",
                controls::text(argument.default_value.as_deref().unwrap_or_default()),
            )
            .field(
                "predefined",
                "Predefined values",
                controls::textarea(&FieldValue::List(
                    argument.predefined.clone().unwrap_or_default(),
                )),
            )
            .remove_button("Remove argument");
        let binding = ChangeBinding::new(
            "updateArgument",
            Coordinates::scoped(scope.command_index(), Some(index)),
        )
        .removable("removeArgument");
        Fragment::new(make_id(kind, &indices), "argument", form.finish(), Some(binding))
    }

    pub fn render_output(&self, scope: Scope, index: usize, output: &Output) -> Fragment {
        let (kind, indices) = element_kind(Collection::Outputs(scope), index);
        let types = OutputType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), t.as_str().to_string()));
        let form = Form::new(kind, &indices)
            .field("contextPath", "Context path", controls::text(&output.context_path))
            .field(
                "description",
                "Description",
                controls::textarea(&FieldValue::Text(output.description.clone())),
            )
            .field(
                "type",
                "Type",
                controls::select(types, &[output.output_type.as_str().to_string()], false),
            )
            .remove_button("Remove output");
        let binding = ChangeBinding::new(
            "updateOutput",
            Coordinates::scoped(scope.command_index(), Some(index)),
        )
        .removable("removeOutput");
        Fragment::new(make_id(kind, &indices), "output", form.finish(), Some(binding))
    }

    /// Renders the top-level scalar fields.
    pub fn render_basic(&self, document: &Document) -> Fragment {
        let form = Form::new(ElementKind::Basic, &[])
            .field("name", "Name", controls::text(document.name()))
            .field("id", "ID", controls::text(document.id()));
        let form = match document {
            Document::Integration(i) => form
                .field("display", "Display name", controls::text(&i.display))
                .field(
                    "category",
                    "Category",
                    controls::text(i.category.as_deref().unwrap_or_default()),
                )
                .field(
                    "description",
                    "Description",
                    controls::textarea(&FieldValue::Text(i.description.clone())),
                )
                .field(
                    "isfetch",
                    "Fetches incidents",
                    controls::checkbox(i.script.isfetch.unwrap_or(false)),
                )
                .field("feed", "Feed", controls::checkbox(i.script.feed.unwrap_or(false))),
            Document::Automation(a) => form.field(
                "description",
                "Description",
                controls::textarea(&FieldValue::Text(a.comment.clone())),
            ),
        };
        Fragment::new(
            make_id(ElementKind::Basic, &[]),
            "basic",
            form.finish(),
            Some(ChangeBinding::new("updateBasic", Coordinates::default())),
        )
    }

    /// Renders the advanced settings. The port control only exists while long-running is on.
    pub fn render_advanced(&self, document: &Document) -> Fragment {
        let settings = document.advanced();
        let mut form = Form::new(ElementKind::Advanced, &[]).field(
            "dockerimage",
            "Docker image",
            controls::text(settings.docker_image.as_deref().unwrap_or_default()),
        );
        if document.kind() == DocumentKind::Integration {
            form = form.field(
                "longRunning",
                "Long running",
                controls::checkbox(settings.long_running),
            );
            if settings.long_running {
                form = form.field(
                    "longRunningPort",
                    "Long running port",
                    controls::checkbox(settings.long_running_port.unwrap_or(false)),
                );
            }
        }
        Fragment::new(
            make_id(ElementKind::Advanced, &[]),
            "advanced",
            form.finish(),
            Some(ChangeBinding::new("updateAdvanced", Coordinates::default())),
        )
    }

    /// An empty diagnostics panel, filled by replace instructions.
    pub fn render_diagnostics(&self, entries: Vec<Element>) -> Fragment {
        Fragment::new(
            make_id(ElementKind::Diagnostics, &[]),
            "diagnostics",
            Element::new("ul").class("diagnostics").children(entries),
            None,
        )
    }

    /// The control that adds a new element to `collection`, carrying the default field set.
    pub fn add_control(&self, collection: Collection) -> Element {
        let (command, label, data) = match collection {
            Collection::Configurations => (
                "addConfiguration",
                "Add parameter",
                json!({
                    "name": self.defaults.parameter_name,
                    "display": "",
                    "type": ParameterKind::ShortText.discriminant(),
                    "required": false,
                }),
            ),
            Collection::Commands => (
                "addCommand",
                "Add command",
                json!({ "name": self.defaults.command_name, "description": "", "deprecated": false }),
            ),
            Collection::Arguments(_) => (
                "addArgument",
                "Add argument",
                json!({
                    "name": self.defaults.argument_name,
                    "description": "",
                    "required": false,
                    "isArray": false,
                    "defaultValue": "",
                }),
            ),
            Collection::Outputs(_) => (
                "addOutput",
                "Add output",
                json!({
                    "contextPath": self.defaults.output_context_path,
                    "description": "",
                    "type": OutputType::Unknown.as_str(),
                }),
            ),
        };
        let mut message = Map::new();
        message.insert("command".to_string(), json!(command));
        if let Collection::Arguments(Scope::Command(c)) | Collection::Outputs(Scope::Command(c)) =
            collection
        {
            message.insert("commandIndex".to_string(), json!(c));
        }
        message.insert("data".to_string(), data);
        controls::message_button(label, &Value::Object(message))
    }

    fn section(&self, title: &str, collection: Collection, document: &Document) -> Result<Element, ModelError> {
        Ok(Element::new("section")
            .child(Element::new("h2").child(title))
            .child(self.render_collection(collection, document)?.root)
            .child(self.add_control(collection)))
    }

    /// Renders the whole document for the initial display.
    pub fn render_document(&self, document: &Document) -> Result<Fragment, ModelError> {
        let mut page = Element::new("div")
            .class("document")
            .child(self.render_basic(document).root)
            .child(self.render_advanced(document).root)
            .child(self.section("Configuration", Collection::Configurations, document)?);
        page = match document.kind() {
            DocumentKind::Integration => {
                page.child(self.section("Commands", Collection::Commands, document)?)
            }
            DocumentKind::Automation => page
                .child(self.section("Arguments", Collection::Arguments(Scope::Root), document)?)
                .child(self.section("Outputs", Collection::Outputs(Scope::Root), document)?),
        };
        page = page.child(self.render_diagnostics(Vec::new()).root);
        Ok(Fragment::new(
            make_id(ElementKind::Document, &[]),
            "document",
            page,
            None,
        ))
    }
}
