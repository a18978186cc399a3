// Main entry point - Dependency injection and server setup
mod application;
mod cli;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::application::cache::TtlCache;
use crate::application::clock::{Clock, SystemClock};
use crate::application::customer_repository::CustomerRepository;
use crate::application::customer_service::CustomerService;
use crate::application::dashboard_service::DashboardService;
use crate::application::maintenance_service::MaintenanceService;
use crate::cli::{Cli, Commands};
use crate::domain::dashboard::TimedSummary;
use crate::infrastructure::config::{load_config, AppConfig, StoreBackend};
use crate::infrastructure::couch_repository::CouchRepository;
use crate::infrastructure::memory_repository::MemoryRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn CustomerRepository> = match config.store.backend {
        StoreBackend::Couchdb => {
            tracing::info!("Using CouchDB store at {}/{}", config.store.url, config.store.database);
            Arc::new(CouchRepository::new(&config.store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Arc::new(MemoryRepository::default())
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let dashboard_cache = Arc::new(TtlCache::new(clock.clone(), config.dashboard.cache_ttl()));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config, repository, clock, dashboard_cache).await,
        Commands::RefreshStatus { dry_run } => {
            let maintenance = MaintenanceService::new(repository, clock, dashboard_cache);
            let report = maintenance.refresh_statuses(dry_run).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn serve(
    config: &AppConfig,
    repository: Arc<dyn CustomerRepository>,
    clock: Arc<dyn Clock>,
    dashboard_cache: Arc<TtlCache<TimedSummary>>,
) -> anyhow::Result<()> {
    // Create services (application layer)
    let dashboard_service =
        DashboardService::new(repository.clone(), clock.clone(), dashboard_cache.clone());
    let customer_service = CustomerService::new(repository, clock, dashboard_cache);

    let state = Arc::new(AppState {
        dashboard_service,
        customer_service,
    });
    let router = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Starting tax-tracker service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
