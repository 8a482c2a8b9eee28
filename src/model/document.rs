use super::entities::{AdvancedSettings, Argument, Command, CommonFields, Output};
use super::parameter::ConfigurationParameter;
use super::{Collection, Scope, de_seq_or_null};
use crate::codec::FieldBag;
use crate::error::ModelError;
use crate::registry;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use tracing::debug;

/// An integration definition: configuration parameters plus an ordered list of commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    pub commonfields: CommonFields,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "de_seq_or_null")]
    pub configuration: Vec<ConfigurationParameter>,
    pub script: IntegrationScript,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// The `script` block of an integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerimage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isfetch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<bool>,
    #[serde(
        default,
        rename = "longRunning",
        skip_serializing_if = "Option::is_none"
    )]
    pub long_running: Option<bool>,
    #[serde(
        default,
        rename = "longRunningPort",
        skip_serializing_if = "Option::is_none"
    )]
    pub long_running_port: Option<bool>,
    #[serde(default, deserialize_with = "de_seq_or_null")]
    pub commands: Vec<Command>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// An automation (script) definition: flat argument and output lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Automation {
    pub commonfields: CommonFields,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerimage: Option<String>,
    #[serde(default, deserialize_with = "de_seq_or_null")]
    pub args: Vec<Argument>,
    #[serde(default, deserialize_with = "de_seq_or_null")]
    pub outputs: Vec<Output>,
    #[serde(
        default,
        deserialize_with = "de_seq_or_null",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub configuration: Vec<ConfigurationParameter>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Integration,
    Automation,
}

/// One editable document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Integration(Integration),
    Automation(Automation),
}

fn check_index(collection: Collection, index: usize, len: usize) -> Result<(), ModelError> {
    if index < len {
        Ok(())
    } else {
        Err(ModelError::IndexOutOfRange {
            collection: collection.name(),
            index,
            len,
        })
    }
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Integration(_) => DocumentKind::Integration,
            Document::Automation(_) => DocumentKind::Automation,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Document::Integration(i) => &i.name,
            Document::Automation(a) => &a.name,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Document::Integration(i) => &i.commonfields.id,
            Document::Automation(a) => &a.commonfields.id,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Document::Integration(i) => &i.description,
            Document::Automation(a) => &a.comment,
        }
    }

    pub fn configuration(&self) -> &[ConfigurationParameter] {
        match self {
            Document::Integration(i) => &i.configuration,
            Document::Automation(a) => &a.configuration,
        }
    }

    fn configuration_mut(&mut self) -> &mut Vec<ConfigurationParameter> {
        match self {
            Document::Integration(i) => &mut i.configuration,
            Document::Automation(a) => &mut a.configuration,
        }
    }

    /// The command list. Automations have none.
    pub fn commands(&self) -> &[Command] {
        match self {
            Document::Integration(i) => &i.script.commands,
            Document::Automation(_) => &[],
        }
    }

    fn commands_mut(&mut self) -> Result<&mut Vec<Command>, ModelError> {
        match self {
            Document::Integration(i) => Ok(&mut i.script.commands),
            Document::Automation(_) => Err(ModelError::ScopeMismatch {
                collection: Collection::Commands.name(),
                reason: "automations have no commands".to_string(),
            }),
        }
    }

    pub fn arguments(&self, scope: Scope) -> Result<&[Argument], ModelError> {
        match (self, scope) {
            (Document::Automation(a), Scope::Root) => Ok(&a.args),
            (Document::Integration(i), Scope::Command(c)) => {
                let commands = &i.script.commands;
                check_index(Collection::Commands, c, commands.len())?;
                Ok(&commands[c].arguments)
            }
            (_, scope) => Err(Self::scope_mismatch(Collection::Arguments(scope))),
        }
    }

    fn arguments_mut(&mut self, scope: Scope) -> Result<&mut Vec<Argument>, ModelError> {
        match (self, scope) {
            (Document::Automation(a), Scope::Root) => Ok(&mut a.args),
            (Document::Integration(i), Scope::Command(c)) => {
                let commands = &mut i.script.commands;
                check_index(Collection::Commands, c, commands.len())?;
                Ok(&mut commands[c].arguments)
            }
            (_, scope) => Err(Self::scope_mismatch(Collection::Arguments(scope))),
        }
    }

    pub fn outputs(&self, scope: Scope) -> Result<&[Output], ModelError> {
        match (self, scope) {
            (Document::Automation(a), Scope::Root) => Ok(&a.outputs),
            (Document::Integration(i), Scope::Command(c)) => {
                let commands = &i.script.commands;
                check_index(Collection::Commands, c, commands.len())?;
                Ok(&commands[c].outputs)
            }
            (_, scope) => Err(Self::scope_mismatch(Collection::Outputs(scope))),
        }
    }

    fn outputs_mut(&mut self, scope: Scope) -> Result<&mut Vec<Output>, ModelError> {
        match (self, scope) {
            (Document::Automation(a), Scope::Root) => Ok(&mut a.outputs),
            (Document::Integration(i), Scope::Command(c)) => {
                let commands = &mut i.script.commands;
                check_index(Collection::Commands, c, commands.len())?;
                Ok(&mut commands[c].outputs)
            }
            (_, scope) => Err(Self::scope_mismatch(Collection::Outputs(scope))),
        }
    }

    fn scope_mismatch(collection: Collection) -> ModelError {
        let reason = match collection {
            Collection::Arguments(Scope::Root) | Collection::Outputs(Scope::Root) => {
                "integration entries must name a command index"
            }
            _ => "automation entries cannot name a command index",
        };
        ModelError::ScopeMismatch {
            collection: collection.name(),
            reason: reason.to_string(),
        }
    }

    /// Number of elements currently in `collection`.
    pub fn len_of(&self, collection: Collection) -> Result<usize, ModelError> {
        match collection {
            Collection::Configurations => Ok(self.configuration().len()),
            Collection::Commands => Ok(self.commands().len()),
            Collection::Arguments(scope) => self.arguments(scope).map(<[_]>::len),
            Collection::Outputs(scope) => self.outputs(scope).map(<[_]>::len),
        }
    }

    // --- Configuration parameters ---

    /// Classifies and constructs a parameter from `fields` and appends it.
    /// Returns the new element's index.
    pub fn add_configuration(&mut self, fields: &FieldBag) -> Result<usize, ModelError> {
        let parameter = registry::construct_from_fields(fields)?;
        debug!(name = parameter.name(), kind = %parameter.kind(), "adding configuration parameter");
        let configuration = self.configuration_mut();
        configuration.push(parameter);
        Ok(configuration.len() - 1)
    }

    /// Replaces the parameter at `index` with one reconstructed from `fields`, returning
    /// the replaced parameter. The kind may change.
    pub fn update_configuration(
        &mut self,
        index: usize,
        fields: &FieldBag,
    ) -> Result<ConfigurationParameter, ModelError> {
        check_index(Collection::Configurations, index, self.configuration().len())?;
        let mut parameter = registry::construct_from_fields(fields)?;
        let configuration = self.configuration_mut();
        parameter.inherit(&configuration[index]);
        Ok(std::mem::replace(&mut configuration[index], parameter))
    }

    pub fn remove_configuration(
        &mut self,
        index: usize,
    ) -> Result<ConfigurationParameter, ModelError> {
        check_index(Collection::Configurations, index, self.configuration().len())?;
        Ok(self.configuration_mut().remove(index))
    }

    // --- Commands ---

    pub fn add_command(&mut self, fields: &FieldBag) -> Result<usize, ModelError> {
        let commands = self.commands_mut()?;
        commands.push(Command::from_fields(fields, None));
        Ok(commands.len() - 1)
    }

    /// Replaces the scalar fields of the command at `index`; its arguments and outputs stay.
    pub fn update_command(&mut self, index: usize, fields: &FieldBag) -> Result<(), ModelError> {
        let commands = self.commands_mut()?;
        check_index(Collection::Commands, index, commands.len())?;
        let previous = commands[index].clone();
        commands[index] = Command::from_fields(fields, Some(previous));
        Ok(())
    }

    pub fn remove_command(&mut self, index: usize) -> Result<Command, ModelError> {
        let commands = self.commands_mut()?;
        check_index(Collection::Commands, index, commands.len())?;
        Ok(commands.remove(index))
    }

    // --- Arguments ---

    /// Inserts an argument at `position` (or appends when `None`), returning its index.
    pub fn add_argument(
        &mut self,
        scope: Scope,
        position: Option<usize>,
        fields: &FieldBag,
    ) -> Result<usize, ModelError> {
        let arguments = self.arguments_mut(scope)?;
        insert_at(
            arguments,
            Collection::Arguments(scope),
            position,
            Argument::from_fields(fields, None),
        )
    }

    pub fn update_argument(
        &mut self,
        scope: Scope,
        index: usize,
        fields: &FieldBag,
    ) -> Result<(), ModelError> {
        let arguments = self.arguments_mut(scope)?;
        check_index(Collection::Arguments(scope), index, arguments.len())?;
        let previous = std::mem::take(&mut arguments[index]);
        arguments[index] = Argument::from_fields(fields, Some(previous));
        Ok(())
    }

    pub fn remove_argument(&mut self, scope: Scope, index: usize) -> Result<Argument, ModelError> {
        let arguments = self.arguments_mut(scope)?;
        check_index(Collection::Arguments(scope), index, arguments.len())?;
        Ok(arguments.remove(index))
    }

    // --- Outputs ---

    pub fn add_output(
        &mut self,
        scope: Scope,
        position: Option<usize>,
        fields: &FieldBag,
    ) -> Result<usize, ModelError> {
        let output = Output::from_fields(fields, None)?;
        let outputs = self.outputs_mut(scope)?;
        insert_at(outputs, Collection::Outputs(scope), position, output)
    }

    pub fn update_output(
        &mut self,
        scope: Scope,
        index: usize,
        fields: &FieldBag,
    ) -> Result<(), ModelError> {
        let outputs = self.outputs_mut(scope)?;
        check_index(Collection::Outputs(scope), index, outputs.len())?;
        let output = Output::from_fields(fields, Some(outputs[index].extra.clone()))?;
        outputs[index] = output;
        Ok(())
    }

    pub fn remove_output(&mut self, scope: Scope, index: usize) -> Result<Output, ModelError> {
        let outputs = self.outputs_mut(scope)?;
        check_index(Collection::Outputs(scope), index, outputs.len())?;
        Ok(outputs.remove(index))
    }

    // --- Scalar sections ---

    /// Replaces the top-level scalar fields present in `fields`.
    ///
    /// Recognised keys: `name`, `id`, `description`, and for integrations also
    /// `display`, `category`, `feed` and `isfetch`.
    pub fn update_basic(&mut self, fields: &FieldBag) {
        match self {
            Document::Integration(i) => {
                if let Some(name) = fields.text("name") {
                    i.name = name;
                }
                if let Some(id) = fields.text("id") {
                    i.commonfields.id = id;
                }
                if let Some(display) = fields.text("display") {
                    i.display = display;
                }
                if let Some(description) = fields.text("description") {
                    i.description = description;
                }
                if fields.contains("category") {
                    i.category = fields.non_empty_text("category");
                }
                if let Some(feed) = fields.flag("feed") {
                    i.script.feed = Some(feed);
                }
                if let Some(isfetch) = fields.flag("isfetch") {
                    i.script.isfetch = Some(isfetch);
                }
            }
            Document::Automation(a) => {
                if let Some(name) = fields.text("name") {
                    a.name = name;
                }
                if let Some(id) = fields.text("id") {
                    a.commonfields.id = id;
                }
                if let Some(description) = fields.text("description") {
                    a.comment = description;
                }
            }
        }
    }

    pub fn advanced(&self) -> AdvancedSettings {
        match self {
            Document::Integration(i) => AdvancedSettings {
                docker_image: i.script.dockerimage.clone(),
                long_running: i.script.long_running.unwrap_or(false),
                long_running_port: i.script.long_running_port,
            },
            Document::Automation(a) => AdvancedSettings {
                docker_image: a.dockerimage.clone(),
                long_running: false,
                long_running_port: None,
            },
        }
    }

    /// Replaces the advanced settings. A long-running-port flag without the long-running
    /// flag is dropped, never stored. Automations only keep the docker image.
    pub fn update_advanced(&mut self, fields: &FieldBag) {
        let settings = AdvancedSettings::from_fields(fields);
        match self {
            Document::Integration(i) => {
                i.script.dockerimage = settings.docker_image;
                if settings.long_running || i.script.long_running.is_some() {
                    i.script.long_running = Some(settings.long_running);
                }
                i.script.long_running_port = settings.long_running_port;
            }
            Document::Automation(a) => {
                if settings.long_running {
                    debug!("ignoring long-running flag on an automation");
                }
                a.dockerimage = settings.docker_image;
            }
        }
    }
}

fn insert_at<T>(
    items: &mut Vec<T>,
    collection: Collection,
    position: Option<usize>,
    item: T,
) -> Result<usize, ModelError> {
    match position {
        None => {
            items.push(item);
            Ok(items.len() - 1)
        }
        Some(index) if index <= items.len() => {
            items.insert(index, item);
            Ok(index)
        }
        Some(index) => Err(ModelError::IndexOutOfRange {
            collection: collection.name(),
            index,
            len: items.len(),
        }),
    }
}
