//! Renders dispatch outcomes into HTTP responses.

use crate::api::dispatch::{DispatchError, DispatchResult};
use crate::config::ErrorStatusPolicy;
use crate::query::{FieldError, ValidationFailure};
use crate::reader::{ReaderError, ReaderErrorKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Body of every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseMapper {
    policy: ErrorStatusPolicy,
}

impl ResponseMapper {
    pub fn new(policy: ErrorStatusPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ErrorStatusPolicy {
        self.policy
    }

    pub fn render<T: Serialize>(&self, outcome: DispatchResult<T>) -> Response {
        match outcome {
            Ok(body) => self.success(body),
            Err(DispatchError::Backend(error)) => self.backend_failure(&error),
        }
    }

    pub fn success<T: Serialize>(&self, body: T) -> Response {
        (StatusCode::OK, Json(body)).into_response()
    }

    pub fn backend_failure(&self, error: &ReaderError) -> Response {
        let body = ErrorBody { message: error.to_string(), errors: Vec::new() };
        (self.status_for(error.kind()), Json(body)).into_response()
    }

    pub fn invalid(&self, failure: &ValidationFailure) -> Response {
        let body = ErrorBody { message: failure.to_string(), errors: failure.field_errors().to_vec() };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }

    pub fn status_for(&self, kind: ReaderErrorKind) -> StatusCode {
        match self.policy {
            ErrorStatusPolicy::Collapse => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorStatusPolicy::ByKind => match kind {
                ReaderErrorKind::NotFound => StatusCode::NOT_FOUND,
                ReaderErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                ReaderErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                ReaderErrorKind::Cancelled => StatusCode::REQUEST_TIMEOUT,
                ReaderErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}
