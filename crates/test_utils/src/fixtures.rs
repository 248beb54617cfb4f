//! Pre-built Test Fixtures
//!
//! Provides ready-to-use bills in each lifecycle state. Timestamps are fixed
//! so fixtures compare predictably.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::BillId;
use domain_billing::{Bill, BillStatus};
use uuid::Uuid;

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Issue time used by every fixture bill
    pub fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    /// Settlement time used by paid fixture bills
    pub fn paid_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap()
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// A fixed bill identifier
    pub fn bill_id() -> BillId {
        BillId::from_uuid(Uuid::from_u128(0x6f1c_2a44_0000_4000_8000_0000_0000_0001))
    }

    /// Owner of fixture bills
    pub fn user_uuid() -> &'static str {
        "3d5b9f3e-8c1a-4e7b-9f0d-2a6c4b8e1f70"
    }

    /// A second owner, for cross-user filtering
    pub fn other_user_uuid() -> &'static str {
        "a1c7e2d4-5b6f-4a8e-9c0d-1e2f3a4b5c6d"
    }
}

/// Fixture for bills in each state
pub struct BillFixtures;

impl BillFixtures {
    /// A pending bill of 100
    pub fn pending() -> Bill {
        Bill {
            uuid: IdFixtures::bill_id(),
            user_uuid: IdFixtures::user_uuid().to_string(),
            bill_status: BillStatus::Pending,
            amount: 100,
            issued_at: TemporalFixtures::issued_at(),
            paid_at: None,
            deleted: false,
        }
    }

    /// A paid bill with its settlement time set
    pub fn paid() -> Bill {
        Bill {
            bill_status: BillStatus::Paid,
            paid_at: Some(TemporalFixtures::paid_at()),
            ..Self::pending()
        }
    }

    /// An overdue bill
    pub fn overdue() -> Bill {
        Bill {
            bill_status: BillStatus::Overdue,
            ..Self::pending()
        }
    }

    /// A soft-deleted pending bill
    pub fn deleted() -> Bill {
        Bill {
            deleted: true,
            ..Self::pending()
        }
    }
}
