use thiserror::Error;

/// Errors raised by document model operations and the variant registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown configuration parameter kind '{discriminant}'")]
    UnknownKind { discriminant: String },

    #[error("Index {index} is out of range for {collection} (length {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Cannot address {collection}: {reason}")]
    ScopeMismatch {
        collection: &'static str,
        reason: String,
    },

    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },
}

/// Errors that prevent a document from being loaded, and therefore a session from starting.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not read document '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Document is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Errors produced while decoding an inbound protocol message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("Unrecognized message command '{command}'")]
    Malformed { command: String },

    #[error("Message has no 'command' tag")]
    MissingCommand,

    #[error("Message '{command}' has an invalid payload: {reason}")]
    InvalidPayload { command: String, reason: String },
}

/// Errors raised by a persistence collaborator.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Could not write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while loading an editor configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// The failure of a single controller transition. The session survives all of these.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}
