//! PostgreSQL Bill Store Adapter
//!
//! Implements the `BillStore` port on top of [`BillRepository`], converting
//! rows to domain bills and database errors to port errors.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use core_kernel::{BillId, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_billing::{Bill, BillFilter, BillStatus, BillStore};

use crate::error::DatabaseError;
use crate::pool::LazyPool;
use crate::repositories::bills::{BillRepository, BillRow, NewBillRow};

const ADAPTER_ID: &str = "postgres-bill-store";

/// PostgreSQL-backed implementation of the BillStore trait
///
/// # Health Checking
///
/// The health check runs `SELECT 1`, which opens the pool if nothing has
/// used it yet.
#[derive(Debug, Clone)]
pub struct PostgresBillStore {
    repository: BillRepository,
}

impl PostgresBillStore {
    /// Creates a new store over a shared lazy pool
    pub fn new(pool: Arc<LazyPool>) -> Self {
        Self {
            repository: BillRepository::new(pool),
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &BillRepository {
        &self.repository
    }
}

impl DomainPort for PostgresBillStore {}

#[async_trait]
impl HealthCheckable for PostgresBillStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = self.repository.ping().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => {
                HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e))
            }
        }
    }
}

#[async_trait]
impl BillStore for PostgresBillStore {
    #[instrument(skip(self, bill), fields(bill_uuid = %bill.uuid))]
    async fn insert(&self, bill: &Bill) -> Result<Bill, PortError> {
        debug!("Inserting bill");

        let row = self
            .repository
            .insert(NewBillRow {
                uuid: bill.uuid.into(),
                user_uuid: bill.user_uuid.clone(),
                bill_status: bill.bill_status.as_str().to_string(),
                amount: bill.amount,
                issued_at: bill.issued_at,
                paid_at: bill.paid_at,
                deleted: bill.deleted,
            })
            .await?;

        Ok(row_to_bill(row)?)
    }

    #[instrument(skip(self), fields(bill_uuid = %uuid))]
    async fn find_active(&self, uuid: BillId) -> Result<Option<Bill>, PortError> {
        let row = self.repository.find_active(uuid.into()).await?;
        Ok(row.map(row_to_bill).transpose()?)
    }

    #[instrument(skip(self))]
    async fn find_active_many(&self, filter: &BillFilter) -> Result<Vec<Bill>, PortError> {
        let rows = self
            .repository
            .find_active_many(
                filter.user_uuid.as_deref(),
                filter.bill_status.map(|s| s.as_str()),
            )
            .await?;

        debug!(count = rows.len(), "Fetched bills");
        Ok(rows
            .into_iter()
            .map(row_to_bill)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[instrument(skip(self), fields(bill_uuid = %uuid, status = %status))]
    async fn update_status(
        &self,
        uuid: BillId,
        status: BillStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Bill>, PortError> {
        let row = self
            .repository
            .update_status(uuid.into(), status.as_str(), paid_at)
            .await?;
        Ok(row.map(row_to_bill).transpose()?)
    }

    #[instrument(skip(self), fields(bill_uuid = %uuid))]
    async fn soft_delete(&self, uuid: BillId) -> Result<bool, PortError> {
        Ok(self.repository.soft_delete(uuid.into()).await?)
    }
}

/// Converts a stored row to a domain bill
///
/// Fails only if the row holds a status the domain does not know.
fn row_to_bill(row: BillRow) -> Result<Bill, DatabaseError> {
    let bill_status = row.bill_status.parse::<BillStatus>().map_err(|_| {
        DatabaseError::CorruptRow(format!(
            "bill {} has unknown status '{}'",
            row.uuid, row.bill_status
        ))
    })?;

    Ok(Bill {
        uuid: BillId::from_uuid(row.uuid),
        user_uuid: row.user_uuid,
        bill_status,
        amount: row.amount,
        issued_at: row.issued_at,
        paid_at: row.paid_at,
        deleted: row.deleted,
    })
}
