//! Errors crossing the span reader boundary.

use thiserror::Error;

/// Coarse cause of a reader failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReaderErrorKind {
    NotFound,
    Timeout,
    Unavailable,
    Cancelled,
    Internal,
}

impl ReaderErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReaderErrorKind::NotFound => "not_found",
            ReaderErrorKind::Timeout => "timeout",
            ReaderErrorKind::Unavailable => "unavailable",
            ReaderErrorKind::Cancelled => "cancelled",
            ReaderErrorKind::Internal => "internal",
        }
    }
}

/// Failure reported by a [`SpanReader`](super::SpanReader).
///
/// Displays as the bare message so it can be shown to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ReaderError {
    kind: ReaderErrorKind,
    message: String,
}

impl ReaderError {
    pub fn new(kind: ReaderErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ReaderErrorKind::Internal, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ReaderErrorKind::NotFound, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ReaderErrorKind::Unavailable, message)
    }

    pub fn timed_out(message: impl Into<String>) -> Self {
        Self::new(ReaderErrorKind::Timeout, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ReaderErrorKind::Cancelled, message)
    }

    pub fn kind(&self) -> ReaderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type ReaderResult<T> = Result<T, ReaderError>;
