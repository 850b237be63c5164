use color_eyre::eyre::{self, Result};
use spanquery::{api::ApiService, app::App, config::Config};
use tracing::info;

/// Run the query API until a shutdown signal arrives
pub async fn run_service(config: &Config) -> Result<()> {
    config.validate().map_err(|e| eyre::eyre!("Invalid configuration: {}", e))?;

    let mut app = App::new(config.clone())
        .await
        .map_err(|e| eyre::eyre!("Failed to create application: {}", e))?;

    app.register_service(ApiService::new());

    info!("Starting Spanquery on {}:{}", config.server.bind_address, config.server.port);
    app.run_until_shutdown().await.map_err(|e| eyre::eyre!("Application error: {}", e))?;

    info!("Shutdown complete");
    Ok(())
}
