use std::sync::Arc;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solarwatch::auth::seed::seed_accounts;
use solarwatch::common::AppState;
use solarwatch::config::{Config, ConfigError};
use solarwatch::routes;
use solarwatch::services::{Capabilities, CityNameNormalizer};
use solarwatch::upstream::{GeoClient, SolarClient, TimeZoneClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,solarwatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting solarwatch...");

    // Load configuration (fail-fast)
    let config = Config::from_env()?;
    tracing::info!(
        deployment = ?config.deployment,
        host = %config.api_host,
        port = config.api_port,
        "Configuration loaded"
    );

    let normalizer = match &config.city_name_replacements {
        Some(rules) => CityNameNormalizer::new(rules)
            .map_err(|e| ConfigError::Invalid("CITY_NAME_REPLACEMENTS", e.to_string()))?,
        None => CityNameNormalizer::default(),
    };

    // Connect to database (fail-fast)
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connection established");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Migrations completed");

    seed_accounts(&db, &config).await?;

    // One connection pool shared by all upstream clients
    let http_client = reqwest::Client::builder().build()?;
    let apis = Capabilities {
        geo: Arc::new(GeoClient::new(http_client.clone(), &config)),
        time_zone: Arc::new(TimeZoneClient::new(http_client.clone(), &config)),
        solar: Some(Arc::new(SolarClient::new(http_client, &config))),
    };
    tracing::info!("Upstream clients initialized");

    let addr = config.bind_address();
    let state = AppState::new(db, config, normalizer, apis);

    // Build router
    let app = routes::build_router(state);

    // Start server with graceful shutdown
    tracing::info!(address = %addr, "Starting server");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
