// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use crate::application::machine_repository::MachineRepository;
use crate::application::machine_service::MachineService;
use crate::application::monitor_session::MonitorSession;
use crate::application::prediction_service::PredictionService;
use crate::infrastructure::config::{load_config, DatabaseBackend, DatabaseSettings};
use crate::infrastructure::memory_repository::MemoryRepository;
use crate::infrastructure::predictor_client::HttpPredictor;
use crate::infrastructure::supabase_repository::SupabaseRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

fn build_repository(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn MachineRepository>> {
    match settings.backend {
        DatabaseBackend::Supabase => {
            let (Some(url), Some(api_key)) = (settings.url.clone(), settings.api_key.clone()) else {
                anyhow::bail!("database.url and database.api_key are required for the supabase backend");
            };
            Ok(Arc::new(SupabaseRepository::new(url, api_key, settings.table.clone())))
        }
        DatabaseBackend::Memory => Ok(Arc::new(MemoryRepository::new(settings.machines.clone()))),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config()?;

    // Create adapters (infrastructure layer)
    let repository = build_repository(&config.database)?;
    let predictor = Arc::new(HttpPredictor::new(
        config.predictor.url.clone(),
        Duration::from_millis(config.predictor.timeout_ms),
    )?);

    // Create services (application layer)
    let state = Arc::new(AppState {
        machine_service: MachineService::new(repository),
        monitor_session: MonitorSession::new(config.collector.settings(), Arc::new(config.collector.sampler())),
        prediction_service: PredictionService::new(predictor),
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.addr.parse()?;
    tracing::info!(backend = ?config.database.backend, "Starting machine-monitor service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
