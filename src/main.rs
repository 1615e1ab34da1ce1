use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use catalog_admin::config;
use catalog_admin::database::DatabaseManager;
use catalog_admin::middleware::RequestGate;
use catalog_admin::session::HttpSessionProvider;
use catalog_admin::{app, AppState};

#[derive(Parser)]
#[command(name = "catalog-admin")]
#[command(about = "Catalog admin API with a session-gated admin area")]
#[command(version)]
struct Cli {
    #[arg(long, env = "CATALOG_PORT", help = "Port to listen on (defaults to the configured port)")]
    port: Option<u16>,

    #[arg(long, help = "Apply database migrations before serving")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and GATE_* settings are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config::config();
    tracing::info!("Starting catalog admin in {:?} mode", config.environment);

    let provider = HttpSessionProvider::from_config(&config.gate)?;
    tracing::info!(endpoint = %provider.endpoint(), "Session provider configured");

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the catalog database")?;

    if cli.migrate || config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }

    let gate = RequestGate::new(config.gate.clone(), Arc::new(provider));
    let state = AppState::new(pool.clone(), gate, config.catalog.clone());

    let port = cli.port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Catalog admin listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
