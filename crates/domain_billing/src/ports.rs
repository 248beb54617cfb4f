//! Billing Domain Ports
//!
//! This module defines what the billing domain needs from the outside
//! world: somewhere to keep bills and somewhere to announce changes to them.
//!
//! # Architecture
//!
//! - [`BillStore`]: persistent store keyed by the bill's external uuid.
//!   Implemented by `infra_db::PostgresBillStore` and, for tests, by
//!   [`mock::InMemoryBillStore`].
//! - [`BillNotifier`]: fire-and-forget notification dispatch. Implemented by
//!   `infra_queue::RedisBillNotifier`, [`NoopNotifier`] and, for tests,
//!   [`mock::RecordingNotifier`].
//!
//! Every store read and every conditional write only ever matches bills
//! whose `deleted` flag is false. A deleted bill is therefore unreachable
//! through the port, which is what makes it immutable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, DomainPort, HealthCheckable, NotificationId, PortError};

use crate::bill::{Bill, BillStatus};

/// Equality filters for listing non-deleted bills
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFilter {
    /// Only bills owned by this user
    pub user_uuid: Option<String>,
    /// Only bills in this status
    pub bill_status: Option<BillStatus>,
}

impl BillFilter {
    /// Matches every non-deleted bill
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches the non-deleted bills of one user
    pub fn for_user(user_uuid: impl Into<String>) -> Self {
        Self {
            user_uuid: Some(user_uuid.into()),
            ..Default::default()
        }
    }

    /// Narrows the filter to a single status
    pub fn with_status(mut self, status: Option<BillStatus>) -> Self {
        self.bill_status = status;
        self
    }

    /// Returns true if the bill is active and satisfies every set filter
    pub fn matches(&self, bill: &Bill) -> bool {
        if bill.deleted {
            return false;
        }
        if let Some(ref user_uuid) = self.user_uuid {
            if &bill.user_uuid != user_uuid {
                return false;
            }
        }
        if let Some(status) = self.bill_status {
            if bill.bill_status != status {
                return false;
            }
        }
        true
    }
}

/// The store port for bill records
#[async_trait]
pub trait BillStore: DomainPort + HealthCheckable {
    /// Persists a newly issued bill and returns it as stored
    ///
    /// Fails with `PortError::Conflict` if the uuid is already taken.
    async fn insert(&self, bill: &Bill) -> Result<Bill, PortError>;

    /// Looks up a non-deleted bill by its external identifier
    async fn find_active(&self, uuid: BillId) -> Result<Option<Bill>, PortError>;

    /// Lists non-deleted bills matching the filter, in store-native order
    async fn find_active_many(&self, filter: &BillFilter) -> Result<Vec<Bill>, PortError>;

    /// Atomically sets status and `paid_at` on a non-deleted bill
    ///
    /// Returns `None` if no non-deleted bill has this uuid.
    async fn update_status(
        &self,
        uuid: BillId,
        status: BillStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Bill>, PortError>;

    /// Atomically marks a non-deleted, non-paid bill as deleted
    ///
    /// Returns `false` if no bill matched those conditions at write time.
    async fn soft_delete(&self, uuid: BillId) -> Result<bool, PortError>;
}

/// What happened to the bill carried by a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillEvent {
    Created,
    StatusUpdated,
}

/// A message announcing a bill change to downstream consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillNotification {
    pub id: NotificationId,
    pub event: BillEvent,
    pub bill: Bill,
    pub occurred_at: DateTime<Utc>,
}

impl BillNotification {
    pub fn new(event: BillEvent, bill: Bill) -> Self {
        Self {
            id: NotificationId::new_v7(),
            event,
            bill,
            occurred_at: Utc::now(),
        }
    }
}

/// The notification port
///
/// Callers treat dispatch as fire-and-forget: an error is logged by the
/// caller and never fails the operation that produced the notification.
#[async_trait]
pub trait BillNotifier: DomainPort {
    async fn notify(&self, notification: &BillNotification) -> Result<(), PortError>;
}

/// Notifier used when no queue is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl DomainPort for NoopNotifier {}

#[async_trait]
impl BillNotifier for NoopNotifier {
    async fn notify(&self, notification: &BillNotification) -> Result<(), PortError> {
        tracing::debug!(
            bill_uuid = %notification.bill.uuid,
            event = ?notification.event,
            "Notifications disabled, dropping message"
        );
        Ok(())
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! In-memory adapters for tests

    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory implementation of [`BillStore`]
    ///
    /// Rows are kept in insertion order, which is this store's native order.
    /// Deleted rows stay in the vector, mirroring soft-delete in a real store.
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryBillStore {
        rows: Arc<RwLock<Vec<Bill>>>,
        unavailable: Arc<AtomicBool>,
    }

    impl InMemoryBillStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with bills, kept as given (including `deleted`)
        pub async fn with_bills(bills: Vec<Bill>) -> Self {
            let store = Self::new();
            store.rows.write().await.extend(bills);
            store
        }

        /// Makes every subsequent call fail with a connection error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Returns a bill regardless of its deleted flag
        pub async fn raw(&self, uuid: BillId) -> Option<Bill> {
            self.rows.read().await.iter().find(|b| b.uuid == uuid).cloned()
        }

        /// Number of rows, deleted ones included
        pub async fn len(&self) -> usize {
            self.rows.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.rows.read().await.is_empty()
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("in-memory store marked unavailable"));
            }
            Ok(())
        }
    }

    impl DomainPort for InMemoryBillStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryBillStore {
        async fn health_check(&self) -> HealthCheckResult {
            match self.check_available() {
                Ok(()) => HealthCheckResult::healthy("in-memory-bill-store", 0),
                Err(e) => HealthCheckResult::unhealthy("in-memory-bill-store", 0, e.to_string()),
            }
        }
    }

    #[async_trait]
    impl BillStore for InMemoryBillStore {
        async fn insert(&self, bill: &Bill) -> Result<Bill, PortError> {
            self.check_available()?;
            let mut rows = self.rows.write().await;
            if rows.iter().any(|b| b.uuid == bill.uuid) {
                return Err(PortError::conflict(format!("bill {} already exists", bill.uuid)));
            }
            rows.push(bill.clone());
            Ok(bill.clone())
        }

        async fn find_active(&self, uuid: BillId) -> Result<Option<Bill>, PortError> {
            self.check_available()?;
            Ok(self
                .rows
                .read()
                .await
                .iter()
                .find(|b| b.uuid == uuid && b.is_active())
                .cloned())
        }

        async fn find_active_many(&self, filter: &BillFilter) -> Result<Vec<Bill>, PortError> {
            self.check_available()?;
            Ok(self
                .rows
                .read()
                .await
                .iter()
                .filter(|b| filter.matches(b))
                .cloned()
                .collect())
        }

        async fn update_status(
            &self,
            uuid: BillId,
            status: BillStatus,
            paid_at: Option<DateTime<Utc>>,
        ) -> Result<Option<Bill>, PortError> {
            self.check_available()?;
            let mut rows = self.rows.write().await;
            match rows.iter_mut().find(|b| b.uuid == uuid && b.is_active()) {
                Some(bill) => {
                    bill.bill_status = status;
                    bill.paid_at = paid_at;
                    Ok(Some(bill.clone()))
                }
                None => Ok(None),
            }
        }

        async fn soft_delete(&self, uuid: BillId) -> Result<bool, PortError> {
            self.check_available()?;
            let mut rows = self.rows.write().await;
            match rows
                .iter_mut()
                .find(|b| b.uuid == uuid && b.is_active() && !b.bill_status.is_paid())
            {
                Some(bill) => {
                    bill.deleted = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    /// Notifier that keeps every message it is given
    #[derive(Debug, Default, Clone)]
    pub struct RecordingNotifier {
        sent: Arc<RwLock<Vec<BillNotification>>>,
        failing: bool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// A notifier whose every dispatch fails (nothing is recorded)
        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Default::default()
            }
        }

        /// Messages dispatched so far, oldest first
        pub async fn sent(&self) -> Vec<BillNotification> {
            self.sent.read().await.clone()
        }

        /// Waits until at least `count` messages have arrived, or one second
        /// has passed, and returns what was recorded
        ///
        /// Dispatch runs on a spawned task, so tests that expect a message
        /// must wait for it rather than read [`sent`](Self::sent) directly.
        pub async fn wait_for(&self, count: usize) -> Vec<BillNotification> {
            let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
            loop {
                let sent = self.sent().await;
                if sent.len() >= count || tokio::time::Instant::now() >= deadline {
                    return sent;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
    }

    impl DomainPort for RecordingNotifier {}

    #[async_trait]
    impl BillNotifier for RecordingNotifier {
        async fn notify(&self, notification: &BillNotification) -> Result<(), PortError> {
            if self.failing {
                return Err(PortError::connection("queue unreachable"));
            }
            self.sent.write().await.push(notification.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_skips_deleted() {
        let mut bill = Bill::issue("u1", BillStatus::Pending, 10);
        assert!(BillFilter::all().matches(&bill));

        bill.deleted = true;
        assert!(!BillFilter::all().matches(&bill));
    }

    #[test]
    fn test_filter_user_and_status() {
        let bill = Bill::issue("u1", BillStatus::Overdue, 10);

        assert!(BillFilter::for_user("u1").matches(&bill));
        assert!(!BillFilter::for_user("u2").matches(&bill));
        assert!(BillFilter::for_user("u1")
            .with_status(Some(BillStatus::Overdue))
            .matches(&bill));
        assert!(!BillFilter::for_user("u1")
            .with_status(Some(BillStatus::Paid))
            .matches(&bill));
    }

    #[test]
    fn test_notification_serializes_camel_case() {
        let bill = Bill::issue("u1", BillStatus::Pending, 10);
        let notification = BillNotification::new(BillEvent::Created, bill);
        let json = serde_json::to_value(&notification).unwrap();

        assert_eq!(json["event"], "created");
        assert_eq!(json["bill"]["userUuid"], "u1");
        assert_eq!(json["bill"]["billStatus"], "Pending");
        assert!(json["occurredAt"].is_string());
    }
}
