//! Custom Test Assertions
//!
//! Provides assertion helpers for bill invariants that give more meaningful
//! error messages than standard assertions.

use chrono::{DateTime, Utc};
use domain_billing::{Bill, BillStatus};

/// Asserts that `paid_at` is set exactly when the bill is paid
///
/// # Panics
///
/// Panics if a paid bill has no settlement time, or an unpaid bill has one
pub fn assert_paid_at_consistent(bill: &Bill) {
    match (bill.bill_status, bill.paid_at) {
        (BillStatus::Paid, None) => panic!("Paid bill {} has no paid_at", bill.uuid),
        (status, Some(at)) if status != BillStatus::Paid => {
            panic!("{} bill {} carries paid_at {}", status, bill.uuid, at)
        }
        _ => {}
    }
}

/// Asserts that two bills agree on every publicly exposed field
pub fn assert_public_fields_eq(actual: &Bill, expected: &Bill) {
    assert_eq!(actual.uuid, expected.uuid, "uuid mismatch");
    assert_eq!(actual.user_uuid, expected.user_uuid, "user_uuid mismatch for {}", expected.uuid);
    assert_eq!(
        actual.bill_status, expected.bill_status,
        "bill_status mismatch for {}",
        expected.uuid
    );
    assert_eq!(actual.amount, expected.amount, "amount mismatch for {}", expected.uuid);
    assert!(
        same_instant(Some(actual.issued_at), Some(expected.issued_at)),
        "issued_at mismatch for {}: actual={}, expected={}",
        expected.uuid,
        actual.issued_at,
        expected.issued_at
    );
    assert!(
        same_instant(actual.paid_at, expected.paid_at),
        "paid_at mismatch for {}: actual={:?}, expected={:?}",
        expected.uuid,
        actual.paid_at,
        expected.paid_at
    );
}

// Stores may round timestamps to microseconds
fn same_instant(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).num_microseconds().map_or(false, |d| d.abs() <= 1),
        (None, None) => true,
        _ => false,
    }
}

/// Asserts that no bill in a listing is soft-deleted
pub fn assert_no_deleted(bills: &[Bill]) {
    if let Some(bill) = bills.iter().find(|b| b.deleted) {
        panic!("Listing contains deleted bill {}", bill.uuid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::BillFixtures;

    #[test]
    fn test_fixtures_are_consistent() {
        assert_paid_at_consistent(&BillFixtures::pending());
        assert_paid_at_consistent(&BillFixtures::paid());
        assert_paid_at_consistent(&BillFixtures::overdue());
    }

    #[test]
    #[should_panic(expected = "has no paid_at")]
    fn test_paid_without_paid_at_panics() {
        let mut bill = BillFixtures::paid();
        bill.paid_at = None;
        assert_paid_at_consistent(&bill);
    }

    #[test]
    #[should_panic(expected = "deleted bill")]
    fn test_deleted_in_listing_panics() {
        assert_no_deleted(&[BillFixtures::pending(), BillFixtures::deleted()]);
    }
}
