//! Common test utilities: fixture documents and in-memory collaborators.
use henshu::error::PersistError;
use henshu::model::Document;
use henshu::render::Renderer;
use henshu::sync::{
    Controller, DisplaySurface, Instruction, Notice, NoticeLevel, Persistence, Session,
};
use std::path::{Path, PathBuf};

/// An integration with one command (no arguments), one short-text parameter and an
/// unmodelled key on the parameter.
#[allow(dead_code)]
pub const INTEGRATION_YAML: &str = r#"
commonfields:
  id: sample-integration
  version: -1
name: sample-integration
display: Sample Integration
category: Utilities
description: An integration used in tests.
configuration:
- name: url
  display: Server URL
  type: 0
  required: true
  section: Connect
script:
  type: python
  subtype: python3
  dockerimage: demisto/python3:3.10
  commands:
  - name: test-command
    description: Runs a test.
"#;

/// An automation with two arguments and one output.
#[allow(dead_code)]
pub const AUTOMATION_YAML: &str = r#"
commonfields:
  id: SampleScript
  version: -1
name: SampleScript
comment: Does something useful.
type: python
tags:
- utility
dockerimage: demisto/python3:3.10
args:
- name: value
  description: The input value.
  required: true
- name: mode
  predefined:
  - fast
  - slow
outputs:
- contextPath: Sample.Result
  description: The result.
  type: string
"#;

/// An integration holding one parameter of every kind.
#[allow(dead_code)]
pub const ALL_KINDS_YAML: &str = r#"
commonfields:
  id: kinds
name: kinds
configuration:
- name: short
  display: Short
  type: 0
- name: secret
  display: Secret
  type: 4
- name: flag
  display: Flag
  type: 8
  defaultvalue: "true"
- name: credentials
  display: Username
  displaypassword: Password
  type: 9
- name: long
  type: 12
  defaultvalue: |-
    line one
    line two
- name: choice
  display: Choice
  type: 15
  options:
  - a
  - b
- name: choices
  display: Choices
  type: 16
  defaultvalue: a,c
  options:
  - a
  - b
  - c
script:
  commands: []
"#;

#[allow(dead_code)]
pub fn integration() -> Document {
    Document::from_yaml_str(INTEGRATION_YAML).expect("integration fixture parses")
}

#[allow(dead_code)]
pub fn automation() -> Document {
    Document::from_yaml_str(AUTOMATION_YAML).expect("automation fixture parses")
}

#[allow(dead_code)]
pub fn all_kinds() -> Document {
    Document::from_yaml_str(ALL_KINDS_YAML).expect("all-kinds fixture parses")
}

/// A display surface that keeps everything it was sent.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub instructions: Vec<Instruction>,
    pub notices: Vec<Notice>,
}

#[allow(dead_code)]
impl RecordingSurface {
    pub fn clear(&mut self) {
        self.instructions.clear();
        self.notices.clear();
    }

    pub fn errors(&self) -> Vec<&Notice> {
        self.notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .collect()
    }
}

impl DisplaySurface for RecordingSurface {
    fn post(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Persistence that records saved documents instead of writing files.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    pub saved: Vec<(PathBuf, Document)>,
}

impl Persistence for MemoryPersistence {
    fn save(&mut self, path: &Path, document: &Document) -> Result<(), PersistError> {
        self.saved.push((path.to_path_buf(), document.clone()));
        Ok(())
    }
}

#[allow(dead_code)]
pub type TestController = Controller<RecordingSurface, MemoryPersistence>;

/// A controller over `document` with recording collaborators.
#[allow(dead_code)]
pub fn controller(document: Document) -> TestController {
    Controller::new(
        Session::from_document("fixture.yml", document),
        Renderer::default(),
        RecordingSurface::default(),
        MemoryPersistence::default(),
    )
}
