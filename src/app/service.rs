//! Service abstractions and lifecycle management
use crate::app::{AppState, Result};
use crate::config::Config;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Service initialization error: {0}")]
    Initialization(String),

    #[error("Service start error: {0}")]
    Start(String),
}

/// Service context provided to each service
pub struct ServiceContext<'a> {
    /// Application state
    pub state: Arc<AppState>,
    /// Application configuration
    pub config: &'a Config,
}

impl<'a> ServiceContext<'a> {
    /// Create a new service context
    pub fn with_config(state: Arc<AppState>, config: &'a Config) -> Self {
        Self { state, config }
    }
}

/// Service handle for controlling a running service
pub struct ServiceHandle {
    stop_tx: tokio::sync::oneshot::Sender<()>,
    join_handle: tokio::task::JoinHandle<()>,
}

impl ServiceHandle {
    /// Create a new service handle
    pub fn new(
        stop_tx: tokio::sync::oneshot::Sender<()>,
        join_handle: tokio::task::JoinHandle<()>,
    ) -> Self {
        Self { stop_tx, join_handle }
    }

    /// Stop the service
    pub async fn stop(self) {
        // Receiver may already be gone if the service exited on its own
        let _ = self.stop_tx.send(());

        let timeout_result =
            tokio::time::timeout(std::time::Duration::from_secs(3), self.join_handle).await;

        if timeout_result.is_err() {
            tracing::warn!("Service did not shut down within timeout period");
        }
    }
}

/// Service trait defining lifecycle methods
#[async_trait]
pub trait Service: Send + Sync {
    /// Get the service name
    fn name(&self) -> &str;

    /// Start the service
    async fn start<'a>(&'a self, context: ServiceContext<'a>) -> Result<ServiceHandle>;
}
