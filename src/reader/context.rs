//! Request-scoped cancellation handed to every reader call.

use crate::reader::error::{ReaderError, ReaderResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

/// Cancellation token plus optional deadline for one inbound request.
///
/// The transport owns the token; readers only observe it through
/// [`RequestContext::cancelled`], [`RequestContext::is_cancelled`] or
/// [`RequestContext::run`].
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    token: CancellationToken,
    deadline: Option<Instant>,
}

/// Why a context stopped being live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Done {
    Cancelled,
    DeadlineExceeded,
}

impl RequestContext {
    pub fn new(token: CancellationToken) -> Self {
        Self { request_id: Uuid::new_v4(), token, deadline: None }
    }

    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::new(CancellationToken::new())
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel the context when the returned guard is dropped.
    ///
    /// Handlers hold this for their whole body; if the client disconnects the
    /// handler future is dropped and the reader sees the cancellation.
    pub fn cancel_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the token fires or the deadline passes.
    pub async fn cancelled(&self) -> Done {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => Done::Cancelled,
                _ = tokio::time::sleep_until(deadline) => Done::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                Done::Cancelled
            },
        }
    }

    /// Drive `work` unless the context finishes first.
    pub async fn run<F, T>(&self, work: F) -> ReaderResult<T>
    where
        F: Future<Output = ReaderResult<T>>,
    {
        tokio::select! {
            biased;
            done = self.cancelled() => Err(match done {
                Done::Cancelled => ReaderError::cancelled("request cancelled"),
                Done::DeadlineExceeded => ReaderError::timed_out("request deadline exceeded"),
            }),
            result = work => result,
        }
    }
}
