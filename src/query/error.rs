//! Query-layer error types.

use serde::Serialize;
use thiserror::Error;

/// A single constraint violation, addressed by its JSON path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Why a request body was rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("malformed request body: {0}")]
    Malformed(String),

    #[error("invalid request: {}", summarize(.0))]
    Invalid(Vec<FieldError>),
}

impl ValidationFailure {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ValidationFailure::Malformed(_) => &[],
            ValidationFailure::Invalid(errors) => errors,
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors.iter().map(|e| format!("{}: {}", e.field, e.message)).collect::<Vec<_>>().join("; ")
}

pub type ValidationResult<T> = Result<T, ValidationFailure>;
