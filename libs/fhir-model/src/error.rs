//! Error types for the FHIR object model
//!
//! Every [`ValidationError`] is raised synchronously by a builder's `build()`;
//! a node that exists has already passed all of these checks.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required element: '{0}'")]
    MissingRequiredField(String),

    #[error("Required repeating element '{0}' must contain at least one item")]
    EmptyRequiredCollection(String),

    #[error("Invalid type: {actual} for choice element: '{field}' must be one of: {permitted:?}")]
    InvalidChoiceType {
        field: String,
        actual: String,
        permitted: Vec<String>,
    },

    #[error("ele-1: All FHIR elements must have a @value or children ({0})")]
    EmptyLeafElement(String),

    #[error("Invalid {datatype} value: {message}")]
    InvalidValue { datatype: String, message: String },

    #[error("Element '{field}': reference type '{actual}' must be one of: {permitted:?}")]
    InvalidReferenceType {
        field: String,
        actual: String,
        permitted: Vec<String>,
    },

    #[error("Element '{field}': '{code}' is not a valid code for value set '{value_set}'")]
    InvalidCode {
        field: String,
        code: String,
        value_set: String,
    },
}

impl ValidationError {
    pub(crate) fn invalid_value(datatype: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            datatype: datatype.to_string(),
            message: message.into(),
        }
    }

    /// Name of the element the error refers to, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredField(field)
            | Self::EmptyRequiredCollection(field) => Some(field),
            Self::InvalidChoiceType { field, .. }
            | Self::InvalidReferenceType { field, .. }
            | Self::InvalidCode { field, .. } => Some(field),
            Self::EmptyLeafElement(_) | Self::InvalidValue { .. } => None,
        }
    }
}

/// Errors raised while loading a [`crate::ModelConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse model configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid model configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
