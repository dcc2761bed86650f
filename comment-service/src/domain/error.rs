use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("unexpected storage error: {0}")]
    Unexpected(String),
}
