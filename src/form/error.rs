//! Error types for the form engine

use thiserror::Error;

/// Errors raised while loading schemas, rendering, or applying edits
#[derive(Debug, Error)]
pub enum FormError {
    /// A functor attribute was neither a boolean nor a recognised condition
    #[error("invalid functor: expected a boolean or a condition object, got {0}")]
    InvalidFunctorType(String),

    /// The schema named a field type outside the supported set
    #[error("unknown field type '{0}'")]
    UnknownFieldKind(String),

    /// An edit targeted a field the form does not know about
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// An edit event that makes no sense for the field's kind
    #[error("field '{field}' of type '{kind}' does not accept {event} events")]
    UnsupportedEvent {
        field: String,
        kind: &'static str,
        event: &'static str,
    },

    /// A stored or typed date could not be read
    #[error("invalid date '{0}'")]
    InvalidDate(String),

    /// Text that should have been JSON was not
    #[error("parse error: {0}")]
    Parse(String),

    /// IO error while reading a file input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::Parse(err.to_string())
    }
}

/// Result type alias for form operations
pub type FormResult<T> = Result<T, FormError>;
