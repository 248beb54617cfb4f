//! Billing Service - API Server Binary
//!
//! This binary starts the RPC-over-HTTP server for the billing service.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin billing-api
//!
//! # Run with environment variables
//! BILLING_PORT=50051 BILLING_DATABASE_URL=postgres://... cargo run --bin billing-api
//! ```
//!
//! # Environment Variables
//!
//! * `BILLING_HOST` - Server host (default: 0.0.0.0)
//! * `BILLING_PORT` - Server port (default: 50051)
//! * `BILLING_ENVIRONMENT` - Environment name reported at startup (default: development)
//! * `BILLING_DATABASE_URL` - PostgreSQL connection string
//! * `BILLING_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `BILLING_REDIS_URL` - Redis URL; notifications are disabled when unset
//! * `BILLING_NOTIFICATION_QUEUES` - Comma separated queue names (default: billing-mail-queue)
//! * `BILLING_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `BILLING_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use domain_billing::{BillLifecycleManager, BillNotifier, NoopNotifier};
use infra_db::{DatabaseConfig, LazyPool, PostgresBillStore};
use infra_queue::{RedisBillNotifier, RedisNotifierConfig};
use interface_api::{config::ApiConfig, create_router, telemetry::init_tracing};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The database cannot be reached or the schema cannot be applied
/// - The Redis URL is malformed
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load configuration")?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        environment = %config.environment,
        "Starting billing service"
    );

    let pool = Arc::new(LazyPool::new(
        DatabaseConfig::new(config.database_url.as_str())
            .max_connections(config.db_max_connections),
    ));

    // First use opens the pool and applies the schema
    pool.get().await.context("database unavailable")?;

    let store = Arc::new(PostgresBillStore::new(pool));
    let notifier = build_notifier(&config)?;
    let manager = BillLifecycleManager::new(store, notifier);

    let app = create_router(manager, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Picks the Redis notifier when a URL is configured
fn build_notifier(config: &ApiConfig) -> anyhow::Result<Arc<dyn BillNotifier>> {
    match config.redis_url() {
        Some(url) => {
            let notifier = RedisBillNotifier::new(
                RedisNotifierConfig::new(url).queues(config.notification_queues.iter().cloned()),
            )
            .context("failed to configure the notification queue")?;
            tracing::info!(queues = ?notifier.queues(), "Bill notifications enabled");
            Ok(Arc::new(notifier))
        }
        None => {
            tracing::info!("No redis url configured, bill notifications disabled");
            Ok(Arc::new(NoopNotifier))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
