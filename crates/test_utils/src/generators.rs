//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains bill invariants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::BillId;
use domain_billing::{Bill, BillStatus};
use proptest::prelude::*;

/// Strategy for generating valid BillStatus values
pub fn bill_status_strategy() -> impl Strategy<Value = BillStatus> {
    prop_oneof![
        Just(BillStatus::Pending),
        Just(BillStatus::Paid),
        Just(BillStatus::Overdue),
    ]
}

/// Strategy for status strings that must be rejected
///
/// Includes case variants of the valid names.
pub fn invalid_status_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("pending".to_string()),
        Just("PAID".to_string()),
        Just("overdue ".to_string()),
        "[A-Za-z]{1,12}",
    ]
    .prop_filter("must not be a valid status", |s| s.parse::<BillStatus>().is_err())
}

/// Strategy for generating valid amounts
pub fn amount_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for amounts that must be rejected
pub fn non_positive_amount_strategy() -> impl Strategy<Value = i64> {
    i64::MIN..=0i64
}

/// Strategy for user references in the canonical uuid form
pub fn user_uuid_strategy() -> impl Strategy<Value = String> {
    any::<[u8; 16]>().prop_map(|bytes| uuid::Uuid::from_bytes(bytes).to_string())
}

/// Strategy for generating BillId
pub fn bill_id_strategy() -> impl Strategy<Value = BillId> {
    any::<[u8; 16]>().prop_map(|bytes| BillId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating timestamps within 2024
pub fn timestamp_2024_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..365i64, 0i64..86_400i64).prop_map(|(days, seconds)| {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::days(days)
            + Duration::seconds(seconds)
    })
}

/// Strategy for active bills whose `paid_at` matches their status
pub fn bill_strategy() -> impl Strategy<Value = Bill> {
    (
        bill_id_strategy(),
        user_uuid_strategy(),
        bill_status_strategy(),
        amount_strategy(),
        timestamp_2024_strategy(),
        0i64..30i64,
    )
        .prop_map(|(uuid, user_uuid, bill_status, amount, issued_at, days_to_pay)| Bill {
            uuid,
            user_uuid,
            bill_status,
            amount,
            issued_at,
            paid_at: bill_status.settlement_time(issued_at + Duration::days(days_to_pay)),
            deleted: false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::assert_paid_at_consistent;

    proptest! {
        #[test]
        fn generated_bills_are_consistent(bill in bill_strategy()) {
            assert_paid_at_consistent(&bill);
            prop_assert!(bill.amount > 0);
            prop_assert!(!bill.deleted);
        }

        #[test]
        fn invalid_statuses_do_not_parse(status in invalid_status_strategy()) {
            prop_assert!(status.parse::<BillStatus>().is_err());
        }
    }
}
