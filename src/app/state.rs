//! Application state management
use crate::{
    app::Result,
    config::Config,
    query::{Clock, SystemClock},
    reader::{NullReader, SpanReader},
};
use std::sync::Arc;
use tracing::info;

/// Shared application state
pub struct AppState {
    /// Backend every query is dispatched to
    pub reader: Arc<dyn SpanReader>,
    /// Time source for queries built server-side
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(reader: Arc<dyn SpanReader>) -> Self {
        Self { reader, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// State provider that initializes application components
pub struct StateProvider {
    config: Config,
}

impl StateProvider {
    /// Create a new state provider
    pub async fn new(config: &Config) -> Result<Self> {
        Ok(Self { config: config.clone() })
    }

    /// Initialize and provide the application state
    ///
    /// No storage engine ships with this crate, so the provided reader
    /// answers every query with an empty result. Embedders plug a real one
    /// in through [`crate::app::App::with_state`].
    pub async fn provide(&self) -> Result<Arc<AppState>> {
        info!(
            "Providing application state with the null span reader (api prefix {})",
            self.config.server.api_prefix
        );
        Ok(Arc::new(AppState::new(Arc::new(NullReader))))
    }
}
