use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by field resolution and fill operations.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The top-level attribute is not cast to a structured (array/object) type on the host.
    #[error("attribute `{attribute}` is not cast to a structured type; declare an array, json, object or collection cast")]
    AttributeCast { attribute: String },

    /// The path cannot address a value inside a structured attribute.
    #[error("invalid attribute path `{path}`: {message}")]
    InvalidPath { path: String, message: Cow<'static, str> },

    /// The host entity has no attribute with this name.
    #[error("unknown attribute `{attribute}`")]
    UnknownAttribute { attribute: String },

    /// Converting between the host attribute and its JSON form failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation failed for one or more submitted values.
    #[error("validation failed")]
    Validation(#[from] ValidationError),
}

impl FieldError {
    pub(crate) fn invalid_path(path: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        FieldError::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Collection of validation issues encountered while checking a submission.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues reported for one working path.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationIssue> + 'a {
        self.issues.iter().filter(move |issue| issue.field == field)
    }
}

/// Detailed validation failure for a single working path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading a declarative field schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML schema: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    /// A field definition is unusable, e.g. a regex rule that does not compile.
    #[error("invalid definition for `{field}`: {message}")]
    InvalidDefinition { field: String, message: String },
}

pub type FieldResult<T> = Result<T, FieldError>;

pub type ValidationResult<T> = Result<T, ValidationError>;
