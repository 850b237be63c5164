//! Application module for composition and dependency management

mod service;
mod state;

pub use service::{Service, ServiceContext, ServiceError, ServiceHandle};
pub use state::{AppState, StateProvider};

use crate::config::Config;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Signal handling error: {0}")]
    Signal(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Application result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Core application struct
pub struct App {
    state: Arc<AppState>,
    services: Vec<Box<dyn Service>>,
    config: Config,
}

impl App {
    /// Create a new application instance with the default state
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let state_provider = StateProvider::new(&config).await?;
        let state = state_provider.provide().await?;

        Ok(Self { state, services: Vec::new(), config })
    }

    /// Create an application around caller-provided state, e.g. a real span reader
    pub fn with_state(config: Config, state: Arc<AppState>) -> Result<Self> {
        config.validate()?;
        Ok(Self { state, services: Vec::new(), config })
    }

    /// Register a service with the application
    pub fn register_service<S: Service + 'static>(&mut self, service: S) -> &mut Self {
        self.services.push(Box::new(service));
        self
    }

    /// Get a reference to the application configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start the application and run until shutdown is requested
    pub async fn run_until_shutdown(self) -> Result<()> {
        let mut service_handles = Vec::new();

        for service in &self.services {
            info!("Starting {} service", service.name());
            let context = ServiceContext::with_config(Arc::clone(&self.state), &self.config);
            let handle = service.start(context).await?;
            service_handles.push(handle);
        }

        wait_for_shutdown().await?;

        info!("Stopping application services...");
        for handle in service_handles {
            handle.stop().await;
        }

        info!("Shutdown complete");
        Ok(())
    }
}

/// Wait for a shutdown signal (SIGTERM, SIGINT, or SIGHUP)
async fn wait_for_shutdown() -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigterm.recv() => info!("SIGTERM received, initiating graceful shutdown"),
        _ = sigint.recv() => info!("SIGINT received, initiating graceful shutdown"),
        _ = sighup.recv() => info!("SIGHUP received, initiating graceful shutdown"),
    }

    Ok(())
}
