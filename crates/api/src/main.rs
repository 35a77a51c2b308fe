use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use marie_api::config::{ServerConfig, StoreBackend};
use marie_api::router::build_app_router;
use marie_api::state::AppState;
use marie_core::store::{InMemoryLaboratoryStore, LaboratoryStore};
use marie_db::PgLaboratoryStore;
use marie_events::{EventBus, EventLogger};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marie_api=debug,marie_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store = connect_store(&config.store).await;

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let logger_handle = tokio::spawn(EventLogger::run(event_bus.subscribe()));
    tracing::info!("Event bus created");

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Dropping the last sender closes the channel and lets the logger exit.
    drop(event_bus);
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(drain, logger_handle).await {
        Ok(Ok(logged)) => tracing::info!(logged, "Event logger stopped"),
        Ok(Err(e)) => tracing::error!(error = %e, "Event logger task failed"),
        Err(_) => tracing::warn!("Event logger did not stop in time"),
    }

    tracing::info!("Graceful shutdown complete");
}

/// Open the configured laboratory store.
///
/// For PostgreSQL this also runs the health check, pending migrations and
/// the starter-laboratory seed, panicking on failure so a broken database
/// stops startup.
async fn connect_store(backend: &StoreBackend) -> Arc<dyn LaboratoryStore> {
    match backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory laboratory store; data is not persisted");
            Arc::new(InMemoryLaboratoryStore::seeded())
        }
        StoreBackend::Postgres { database_url } => {
            let pool = marie_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            marie_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            marie_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            marie_db::seed_defaults(&pool)
                .await
                .expect("Failed to seed default laboratories");

            Arc::new(PgLaboratoryStore::new(pool))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
