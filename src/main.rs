// Main entry point - Dependency injection and server setup
use std::net::SocketAddr;
use std::sync::Arc;

use formicarium_monitor::application::acquisition_service::AcquisitionService;
use formicarium_monitor::application::credential_store::CredentialStore;
use formicarium_monitor::application::history_service::HistoryService;
use formicarium_monitor::application::reading_strategy::ReadingStrategy;
use formicarium_monitor::application::refresh_scheduler::start_history_refresh;
use formicarium_monitor::infrastructure::config::load_config;
use formicarium_monitor::infrastructure::credential_store::FileCredentialStore;
use formicarium_monitor::infrastructure::csv_source::source_for_location;
use formicarium_monitor::infrastructure::device_client::{DeviceApiStrategy, SnapshotStrategy};
use formicarium_monitor::infrastructure::synthetic::SyntheticGenerator;
use formicarium_monitor::presentation::app_state::AppState;
use formicarium_monitor::presentation::create_router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,formicarium_monitor=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    // Load configuration
    let config = load_config()?;
    tracing::info!(
        csv_source = %config.history.csv_source,
        snapshot = ?config.sensor.snapshot_url,
        "Loaded configuration"
    );

    let client = reqwest::Client::new();

    // Credential store, seeded once from config if empty
    let credentials: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::new(&config.sensor.credential_file));
    if let Some(initial) = config.sensor.initial_api_key.as_deref() {
        if credentials.load().await?.is_none() {
            credentials.save(initial).await?;
            tracing::info!("Stored initial API credential");
        }
    }

    // Acquisition strategies, in fallback order
    let mut strategies: Vec<Arc<dyn ReadingStrategy>> = Vec::new();
    if let Some(device_id) = config.sensor.device_id.clone() {
        strategies.push(Arc::new(DeviceApiStrategy::new(
            client.clone(),
            config.sensor.device_api_url.clone(),
            config.sensor.device_sku.clone(),
            device_id,
            credentials.clone(),
        )));
    }
    if let Some(snapshot_url) = config.sensor.snapshot_url.clone() {
        strategies.push(Arc::new(SnapshotStrategy::new(client.clone(), snapshot_url)));
    }
    if strategies.is_empty() {
        tracing::warn!("No live sensor source configured, serving demo data only");
    }

    // Create services (application layer)
    let acquisition_service = AcquisitionService::new(
        strategies,
        Arc::new(SyntheticGenerator::new()),
        credentials,
    );
    let history_service = HistoryService::new(
        source_for_location(client, &config.history.csv_source),
        config.history.refresh_interval(),
    );

    tokio::spawn(start_history_refresh(history_service.clone()));

    // Create application state
    let state = Arc::new(AppState {
        acquisition_service,
        history_service,
    });

    let router = create_router(state);

    // Start server
    let addr: SocketAddr = config.server.addr().parse()?;
    tracing::info!("Starting formicarium-monitor on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
