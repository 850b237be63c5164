use std::net::SocketAddr;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::api::{ApiState, router};
use crate::app::{Service, ServiceContext, ServiceError, ServiceHandle};

/// HTTP query API integrated with the App's service lifecycle
#[derive(Debug, Default)]
pub struct ApiService;

impl ApiService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Service for ApiService {
    fn name(&self) -> &str {
        "api"
    }

    async fn start<'a>(&'a self, context: ServiceContext<'a>) -> crate::app::Result<ServiceHandle> {
        let server = &context.config.server;
        let socket_addr = format!("{}:{}", server.bind_address, server.port)
            .parse::<SocketAddr>()
            .map_err(|e| ServiceError::Initialization(format!("Invalid socket address: {}", e)))?;

        // Fires on stop; every in-flight request context is a child of it
        let cancellation_token = CancellationToken::new();

        let state = ApiState::new(context.state.reader.clone())
            .with_clock(context.state.clock.clone())
            .with_error_status(server.error_status)
            .with_request_timeout(server.request_timeout())
            .with_shutdown_token(cancellation_token.clone());
        let app = router(state, &server.api_prefix);

        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .map_err(|e| ServiceError::Start(format!("Failed to bind {}: {}", socket_addr, e)))?;

        info!(
            "Query API listening on {} (prefix \"{}\", error status policy {})",
            socket_addr, server.api_prefix, server.error_status
        );

        let ct_shutdown = cancellation_token.child_token();
        let server_handle = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                ct_shutdown.cancelled().await;
                info!("Query API shutting down");
            });

            if let Err(e) = server.await {
                error!("Query API shutdown with error: {}", e);
            }
        });

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let _ = stop_rx.await;
            cancellation_token.cancel();
        });

        Ok(ServiceHandle::new(stop_tx, server_handle))
    }
}
