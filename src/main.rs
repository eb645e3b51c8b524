use anyhow::Result;
use log::info;
use std::path::Path;
use std::sync::Arc;
use trailguard::api::rest::{AppState, RestApi};
use trailguard::config;
use trailguard::db::DatabaseService;
use trailguard::security::AuthService;
use trailguard::services::{AlertService, DisabledDetector, NotificationService};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config file path as the first argument
    let config_path = std::env::args().nth(1);
    let config = config::load_config(config_path.as_deref().map(Path::new))?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.api.log_level),
    )
    .init();
    info!("Starting TrailGuard wildlife monitoring service");

    // Database connection pool and schema
    let database = Arc::new(DatabaseService::new(&config.database).await?);

    // Dispatcher and auth are built once here and injected
    let notifier = Arc::new(NotificationService::from_config(&config.notifications)?);
    let auth_service = Arc::new(AuthService::new(&config.security));
    let alert_service = Arc::new(AlertService::new(Arc::clone(&database.pool), notifier));

    let state = AppState {
        database,
        alert_service,
        auth_service,
        detector: Arc::new(DisabledDetector),
    };

    let http_server = RestApi::new(&config.api, state);
    http_server.run().await?;

    Ok(())
}
