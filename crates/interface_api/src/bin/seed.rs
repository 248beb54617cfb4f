//! Billing Service - Seed Binary
//!
//! Fills the configured database with fake bills for local development.
//!
//! # Usage
//!
//! ```bash
//! # Seed the default number of bills
//! cargo run --bin billing-seed
//!
//! # Seed a specific number of bills
//! cargo run --bin billing-seed -- 1000
//! ```

use std::sync::Arc;

use anyhow::Context;

use infra_db::seed::{seed_bills, DEFAULT_SEED_COUNT};
use infra_db::{DatabaseConfig, LazyPool, PostgresBillStore};
use interface_api::{config::ApiConfig, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.log_level, config.log_format);

    let count = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("bill count must be a non-negative integer, got '{}'", arg))?,
        None => DEFAULT_SEED_COUNT,
    };

    let pool = Arc::new(LazyPool::new(
        DatabaseConfig::new(config.database_url.as_str())
            .max_connections(config.db_max_connections),
    ));
    let store = PostgresBillStore::new(pool);

    let written = seed_bills(&store, count)
        .await
        .context("seeding failed")?;

    tracing::info!(written, "Inserted fake bills");
    Ok(())
}
