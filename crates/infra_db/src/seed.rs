//! Fake bill generation for populating a development database
//!
//! Generated bills always satisfy the store's invariants: a positive whole
//! amount, and `paid_at` present exactly when the status is `Paid`, falling
//! between `issued_at` and now.

use chrono::{DateTime, Duration, Utc};
use fake::faker::chrono::en::DateTimeBetween;
use fake::uuid::UUIDv4;
use fake::Fake;
use tracing::{info, warn};
use uuid::Uuid;

use core_kernel::{BillId, PortError};
use domain_billing::{Bill, BillStatus, BillStore};

/// Number of bills written when no count is given
pub const DEFAULT_SEED_COUNT: usize = 350;

const MIN_AMOUNT: i64 = 10;
const MAX_AMOUNT: i64 = 1000;
const ISSUE_WINDOW_DAYS: i64 = 30;

/// Generates one fake bill issued within the last thirty days
pub fn generate_fake_bill() -> Bill {
    let now = Utc::now();
    let issued_at: DateTime<Utc> =
        DateTimeBetween(now - Duration::days(ISSUE_WINDOW_DAYS), now).fake();
    let bill_status = BillStatus::ALL[(0..BillStatus::ALL.len()).fake::<usize>()];
    let paid_at = if bill_status.is_paid() {
        let window = (now - issued_at).num_seconds().max(0);
        Some(issued_at + Duration::seconds((0..=window).fake::<i64>()))
    } else {
        None
    };

    Bill {
        uuid: BillId::new(),
        user_uuid: UUIDv4.fake::<Uuid>().to_string(),
        bill_status,
        amount: (MIN_AMOUNT..=MAX_AMOUNT).fake::<i64>(),
        issued_at,
        paid_at,
        deleted: false,
    }
}

/// Generates `count` independent fake bills
pub fn generate_fake_bills(count: usize) -> Vec<Bill> {
    (0..count).map(|_| generate_fake_bill()).collect()
}

/// Writes `count` fake bills through the store
///
/// Stops at the first failure. Returns the number of bills written.
pub async fn seed_bills(store: &dyn BillStore, count: usize) -> Result<usize, PortError> {
    info!(count, "Seeding bills");

    let mut written = 0;
    for bill in generate_fake_bills(count) {
        if let Err(e) = store.insert(&bill).await {
            warn!(written, error = %e, "Seeding stopped");
            return Err(e);
        }
        written += 1;
    }

    info!(written, "Seeding complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_billing::{BillFilter, InMemoryBillStore};

    #[test]
    fn test_generated_bills_respect_invariants() {
        let now = Utc::now();
        for bill in generate_fake_bills(500) {
            assert!((MIN_AMOUNT..=MAX_AMOUNT).contains(&bill.amount));
            assert!(bill.issued_at <= now + Duration::seconds(1));
            assert!(bill.issued_at >= now - Duration::days(ISSUE_WINDOW_DAYS) - Duration::seconds(1));
            assert!(!bill.deleted);
            assert!(Uuid::parse_str(&bill.user_uuid).is_ok());

            match bill.paid_at {
                Some(paid_at) => {
                    assert_eq!(bill.bill_status, BillStatus::Paid);
                    assert!(paid_at >= bill.issued_at);
                }
                None => assert_ne!(bill.bill_status, BillStatus::Paid),
            }
        }
    }

    #[test]
    fn test_generated_bills_have_distinct_uuids() {
        let bills = generate_fake_bills(100);
        let mut ids: Vec<_> = bills.iter().map(|b| b.uuid).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[tokio::test]
    async fn test_seed_bills_writes_through_store() {
        let store = InMemoryBillStore::new();
        let written = seed_bills(&store, 25).await.unwrap();

        assert_eq!(written, 25);
        assert_eq!(store.find_active_many(&BillFilter::all()).await.unwrap().len(), 25);
    }

    #[tokio::test]
    async fn test_seed_bills_stops_on_store_failure() {
        let store = InMemoryBillStore::new();
        store.set_unavailable(true);

        let result = seed_bills(&store, 5).await;
        assert!(result.unwrap_err().is_transient());
    }
}
