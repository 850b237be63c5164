//! Shared state behind every route.

use crate::api::dispatch::Dispatcher;
use crate::api::response::ResponseMapper;
use crate::config::ErrorStatusPolicy;
use crate::query::{Clock, SystemClock};
use crate::reader::{RequestContext, SpanReader};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct ApiState {
    dispatcher: Dispatcher,
    mapper: ResponseMapper,
    clock: Arc<dyn Clock>,
    shutdown: CancellationToken,
    request_timeout: Option<Duration>,
}

impl ApiState {
    pub fn new(reader: Arc<dyn SpanReader>) -> Self {
        Self {
            dispatcher: Dispatcher::new(reader),
            mapper: ResponseMapper::default(),
            clock: Arc::new(SystemClock),
            shutdown: CancellationToken::new(),
            request_timeout: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_error_status(mut self, policy: ErrorStatusPolicy) -> Self {
        self.mapper = ResponseMapper::new(policy);
        self
    }

    /// Requests in flight are cancelled when `token` fires
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn mapper(&self) -> &ResponseMapper {
        &self.mapper
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Fresh context for one inbound request
    pub fn request_context(&self) -> RequestContext {
        let ctx = RequestContext::new(self.shutdown.child_token());
        match self.request_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}
