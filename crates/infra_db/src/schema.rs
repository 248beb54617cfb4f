//! Schema bootstrap for the bills table

use sqlx::PgPool;
use tracing::info;

use crate::error::DatabaseError;

const BILLS_SCHEMA: &str = include_str!("../../../migrations/20240101_000001_bills.sql");

/// Creates the bills table and its indexes if they do not exist yet
pub async fn apply(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::raw_sql(BILLS_SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::SchemaFailed(e.to_string()))?;

    info!("Bills schema is in place");
    Ok(())
}
