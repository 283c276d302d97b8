//! Error types for crudkit.

use thiserror::Error;

/// Action definition errors - raised when a draft is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionConfigError {
    /// Neither a label nor an icon was configured.
    #[error(
        "The label and icon of an action cannot be null at the same time. \
         Either set the label, the icon or both for the \"{action}\" action."
    )]
    MissingLabelAndIcon { action: String },

    /// No crud action and no route were configured.
    #[error(
        "Actions must link to either a route or a CRUD action. \
         Set the \"link_to_crud_action()\" or \"link_to_route()\" method for the \"{action}\" action."
    )]
    MissingLinkTarget { action: String },
}

/// Entity descriptor errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// A patch named a field the descriptor does not declare.
    #[error(
        "The \"{name}\" option is not a valid entity option name. Valid option names are: {valid}"
    )]
    InvalidProperty { name: String, valid: String },

    /// A patch value could not be converted to the field's type.
    #[error("Invalid value for entity option \"{name}\": {message}")]
    InvalidPropertyValue { name: String, message: String },

    /// Introspection was requested but no persistence metadata is attached.
    #[error("Entity '{fqcn}' has no persistence metadata")]
    MissingMetadata { fqcn: String },

    /// The property is not mapped by the persistence metadata.
    #[error("Entity '{fqcn}' has no mapped property '{name}'")]
    UnknownProperty { fqcn: String, name: String },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}
