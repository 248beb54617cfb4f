//! Bill repository implementation
//!
//! Every read and every conditional write filters on `deleted = FALSE`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::pool::LazyPool;

const BILL_COLUMNS: &str =
    "id, uuid, user_uuid, bill_status, amount, issued_at, paid_at, deleted";

/// A row of the `bills` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillRow {
    pub id: i64,
    pub uuid: Uuid,
    pub user_uuid: String,
    pub bill_status: String,
    pub amount: i64,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub deleted: bool,
}

/// Data for inserting a new bill
#[derive(Debug, Clone)]
pub struct NewBillRow {
    pub uuid: Uuid,
    pub user_uuid: String,
    pub bill_status: String,
    pub amount: i64,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub deleted: bool,
}

/// Repository for the `bills` table
///
/// Holds the lazily opened pool; the first query opens it.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: Arc<LazyPool>,
}

impl BillRepository {
    /// Creates a new BillRepository over a shared pool handle
    pub fn new(pool: Arc<LazyPool>) -> Self {
        Self { pool }
    }

    /// Inserts a bill and returns the stored row
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DuplicateEntry` if the uuid already exists
    pub async fn insert(&self, bill: NewBillRow) -> Result<BillRow, DatabaseError> {
        let pool = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO bills (uuid, user_uuid, bill_status, amount, issued_at, paid_at, deleted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {BILL_COLUMNS}"
        );

        let row = sqlx::query_as::<_, BillRow>(&sql)
            .bind(bill.uuid)
            .bind(&bill.user_uuid)
            .bind(&bill.bill_status)
            .bind(bill.amount)
            .bind(bill.issued_at)
            .bind(bill.paid_at)
            .bind(bill.deleted)
            .fetch_one(pool)
            .await?;

        Ok(row)
    }

    /// Finds a non-deleted bill by uuid
    pub async fn find_active(&self, uuid: Uuid) -> Result<Option<BillRow>, DatabaseError> {
        let pool = self.pool.get().await?;
        let sql = format!("SELECT {BILL_COLUMNS} FROM bills WHERE uuid = $1 AND deleted = FALSE");

        let row = sqlx::query_as::<_, BillRow>(&sql)
            .bind(uuid)
            .fetch_optional(pool)
            .await?;

        Ok(row)
    }

    /// Lists non-deleted bills, optionally narrowed by owner and status
    ///
    /// Rows come back in insertion order.
    pub async fn find_active_many(
        &self,
        user_uuid: Option<&str>,
        bill_status: Option<&str>,
    ) -> Result<Vec<BillRow>, DatabaseError> {
        let pool = self.pool.get().await?;
        let sql = format!(
            "SELECT {BILL_COLUMNS} FROM bills \
             WHERE ($1::text IS NULL OR user_uuid = $1) \
               AND ($2::text IS NULL OR bill_status = $2) \
               AND deleted = FALSE \
             ORDER BY id"
        );

        let rows = sqlx::query_as::<_, BillRow>(&sql)
            .bind(user_uuid)
            .bind(bill_status)
            .fetch_all(pool)
            .await?;

        Ok(rows)
    }

    /// Sets status and paid_at on a non-deleted bill in a single statement
    pub async fn update_status(
        &self,
        uuid: Uuid,
        bill_status: &str,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Option<BillRow>, DatabaseError> {
        let pool = self.pool.get().await?;
        let sql = format!(
            "UPDATE bills SET bill_status = $2, paid_at = $3 \
             WHERE uuid = $1 AND deleted = FALSE \
             RETURNING {BILL_COLUMNS}"
        );

        let row = sqlx::query_as::<_, BillRow>(&sql)
            .bind(uuid)
            .bind(bill_status)
            .bind(paid_at)
            .fetch_optional(pool)
            .await?;

        Ok(row)
    }

    /// Soft-deletes a non-deleted, non-paid bill
    ///
    /// Returns whether a row was changed.
    pub async fn soft_delete(&self, uuid: Uuid) -> Result<bool, DatabaseError> {
        let pool = self.pool.get().await?;

        let result = sqlx::query(
            "UPDATE bills SET deleted = TRUE \
             WHERE uuid = $1 AND deleted = FALSE AND bill_status <> 'Paid'",
        )
        .bind(uuid)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Round-trips a trivial query
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        let pool = self.pool.get().await?;
        sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
        Ok(())
    }
}
