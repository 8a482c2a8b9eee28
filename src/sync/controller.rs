use super::protocol::{InboundMessage, Instruction, Notice};
use super::session::Session;
use super::surface::{DisplaySurface, Persistence};
use crate::diagnostics::{self, LintReport};
use crate::error::{MessageError, ModelError, SessionError};
use crate::model::{Collection, ConfigurationParameter, Scope};
use crate::registry;
use crate::render::{EntityRef, Fragment, Renderer, container_id};
use serde_json::Value;
use std::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

/// The protocol state machine of one editing session.
///
/// There is a single steady state, entered on construction. Each message is one atomic
/// transition: the model is validated and mutated, then only the affected fragments are
/// re-rendered and posted. A failed transition leaves the document untouched.
pub struct Controller<S: DisplaySurface, P: Persistence> {
    session: Session,
    renderer: Renderer,
    surface: S,
    persistence: P,
}

impl<S: DisplaySurface, P: Persistence> Controller<S, P> {
    pub fn new(session: Session, renderer: Renderer, surface: S, persistence: P) -> Self {
        Self {
            session,
            renderer,
            surface,
            persistence,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Tears the controller down, handing back the session and collaborators.
    pub fn into_parts(self) -> (Session, S, P) {
        (self.session, self.surface, self.persistence)
    }

    /// Posts the full document render, replacing the `document` container.
    pub fn show(&mut self) -> Result<(), ModelError> {
        let page = self.renderer.render_document(self.session.document())?;
        self.surface
            .post(Instruction::replace(page.id.clone(), page.to_markup()));
        Ok(())
    }

    /// Processes messages strictly in arrival order, one at a time, until every sender
    /// hangs up.
    pub fn run(mut self, inbound: Receiver<Value>) -> (Session, S, P) {
        info!(path = %self.session.path().display(), "session ready");
        for raw in inbound {
            self.dispatch(&raw);
        }
        self.into_parts()
    }

    /// Handles one raw message. Never fails: unknown tags are ignored and every other
    /// failure becomes a single notice.
    pub fn dispatch(&mut self, raw: &Value) {
        match InboundMessage::parse(raw) {
            Ok(message) => {
                let tag = message.tag();
                debug!(command = tag, "handling message");
                if let Err(e) = self.handle(message) {
                    self.report(tag, e);
                }
            }
            Err(MessageError::Malformed { command }) => {
                debug!(command = %command, "ignoring unrecognized message");
            }
            Err(MessageError::MissingCommand) => {
                debug!("ignoring message without a command tag");
            }
            Err(e) => self.report("message", e.into()),
        }
    }

    fn report(&mut self, tag: &str, error: SessionError) {
        warn!(command = tag, error = %error, "message failed");
        self.surface.notify(Notice::error(error.to_string()));
    }

    /// Applies one decoded message and posts the resulting instructions.
    pub fn handle(&mut self, message: InboundMessage) -> Result<(), SessionError> {
        if let InboundMessage::Save = message {
            return self.save();
        }
        let instructions = self.apply(message)?;
        self.session.mark_dirty();
        for instruction in instructions {
            self.surface.post(instruction);
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), SessionError> {
        let path = self.session.path().to_path_buf();
        self.persistence.save(&path, self.session.document())?;
        self.session.mark_saved();
        self.surface
            .notify(Notice::info(format!("Saved {}", path.display())));
        Ok(())
    }

    fn apply(&mut self, message: InboundMessage) -> Result<Vec<Instruction>, ModelError> {
        let document = self.session.document_mut();
        let instructions = match message {
            InboundMessage::Save => Vec::new(),
            InboundMessage::UpdateBasic { data } => {
                document.update_basic(&data);
                vec![Self::replace_with(self.renderer.render_basic(document))]
            }
            InboundMessage::UpdateAdvanced { data } => {
                document.update_advanced(&data);
                vec![Self::replace_with(self.renderer.render_advanced(document))]
            }
            InboundMessage::AddConfiguration { data } => {
                let index = document.add_configuration(&data)?;
                let fragment = registry::render(&document.configuration()[index], index);
                vec![Self::append(Collection::Configurations, fragment)]
            }
            InboundMessage::UpdateConfiguration {
                configuration_index,
                data,
            } => {
                let previous = document.update_configuration(configuration_index, &data)?;
                let current = &document.configuration()[configuration_index];
                if previous.kind() != current.kind() {
                    debug!(from = %previous.kind(), to = %current.kind(), "configuration kind changed");
                    vec![self.replace_collection(Collection::Configurations)?]
                } else if toggles_changed(&previous, current) {
                    let fragment = registry::render(current, configuration_index);
                    vec![Self::replace_with(fragment)]
                } else {
                    Vec::new()
                }
            }
            InboundMessage::RemoveConfiguration {
                configuration_index,
            } => {
                let removed = document.remove_configuration(configuration_index)?;
                debug!(name = removed.name(), "removed configuration parameter");
                vec![self.replace_collection(Collection::Configurations)?]
            }
            InboundMessage::AddCommand { data } => {
                let index = document.add_command(&data)?;
                let fragment = self.renderer.render_command(index, &document.commands()[index]);
                vec![Self::append(Collection::Commands, fragment)]
            }
            InboundMessage::UpdateCommand { index, data } => {
                document.update_command(index, &data)?;
                vec![self.replace_collection(Collection::Commands)?]
            }
            InboundMessage::RemoveCommand { index } => {
                let removed = document.remove_command(index)?;
                debug!(name = %removed.name, "removed command");
                vec![self.replace_collection(Collection::Commands)?]
            }
            InboundMessage::AddArgument {
                command_index,
                index,
                data,
            } => {
                let scope = Scope::from_command_index(command_index);
                let added = document.add_argument(scope, index, &data)?;
                self.after_insert(Collection::Arguments(scope), added)?
            }
            InboundMessage::UpdateArgument {
                command_index,
                index,
                data,
            } => {
                document.update_argument(Scope::from_command_index(command_index), index, &data)?;
                Vec::new()
            }
            InboundMessage::RemoveArgument {
                command_index,
                index,
            } => {
                let scope = Scope::from_command_index(command_index);
                let removed = document.remove_argument(scope, index)?;
                debug!(name = %removed.name, "removed argument");
                vec![self.replace_collection(Collection::Arguments(scope))?]
            }
            InboundMessage::AddOutput {
                command_index,
                index,
                data,
            } => {
                let scope = Scope::from_command_index(command_index);
                let added = document.add_output(scope, index, &data)?;
                self.after_insert(Collection::Outputs(scope), added)?
            }
            InboundMessage::UpdateOutput {
                command_index,
                index,
                data,
            } => {
                document.update_output(Scope::from_command_index(command_index), index, &data)?;
                Vec::new()
            }
            InboundMessage::RemoveOutput {
                command_index,
                index,
            } => {
                let scope = Scope::from_command_index(command_index);
                let removed = document.remove_output(scope, index)?;
                debug!(context_path = %removed.context_path, "removed output");
                vec![self.replace_collection(Collection::Outputs(scope))?]
            }
        };
        Ok(instructions)
    }

    /// An element appended at the end gets its own fragment; one inserted in the middle
    /// shifts its followers, so the whole collection is replaced.
    fn after_insert(
        &self,
        collection: Collection,
        index: usize,
    ) -> Result<Vec<Instruction>, ModelError> {
        let document = self.session.document();
        let len = document.len_of(collection)?;
        if index + 1 < len {
            return Ok(vec![self.replace_collection(collection)?]);
        }
        let (scope, entity) = match collection {
            Collection::Arguments(scope) => (scope, EntityRef::Argument(&document.arguments(scope)?[index])),
            Collection::Outputs(scope) => (scope, EntityRef::Output(&document.outputs(scope)?[index])),
            Collection::Configurations => (
                Scope::Root,
                EntityRef::Configuration(&document.configuration()[index]),
            ),
            Collection::Commands => (Scope::Root, EntityRef::Command(&document.commands()[index])),
        };
        let fragment = self.renderer.render_single(scope, index, entity);
        Ok(vec![Self::append(collection, fragment)])
    }

    fn replace_collection(&self, collection: Collection) -> Result<Instruction, ModelError> {
        let fragment = self
            .renderer
            .render_collection(collection, self.session.document())?;
        Ok(Self::replace_with(fragment))
    }

    fn replace_with(fragment: Fragment) -> Instruction {
        Instruction::replace(fragment.id.clone(), fragment.to_markup())
    }

    fn append(collection: Collection, fragment: Fragment) -> Instruction {
        Instruction::add(container_id(collection), fragment.to_markup())
    }

    /// Shows the findings of a lint report for this session's file.
    pub fn surface_diagnostics(&mut self, report: &LintReport) {
        let found = report.for_path(self.session.path());
        let summary = diagnostics::summarize(&found);
        let panel = self
            .renderer
            .render_diagnostics(found.iter().map(|d| d.to_element()).collect());
        self.surface.post(Self::replace_with(panel));
        let notice = if found.is_empty() {
            Notice::info(summary)
        } else {
            Notice::warning(summary)
        };
        self.surface.notify(notice);
    }
}

/// Whether an Authentication parameter's label fields changed between enabled and
/// disabled, which the display can only learn from a fresh fragment.
fn toggles_changed(before: &ConfigurationParameter, after: &ConfigurationParameter) -> bool {
    match (before, after) {
        (
            ConfigurationParameter::Authentication {
                display_password: password_before,
                hidden_username: hidden_before,
                ..
            },
            ConfigurationParameter::Authentication {
                display_password: password_after,
                hidden_username: hidden_after,
                ..
            },
        ) => {
            hidden_before.get() != hidden_after.get()
                || password_before.is_empty() != password_after.is_empty()
        }
        _ => false,
    }
}
