//! Test Data Builders
//!
//! Provides a builder for bills with sensible defaults, so tests only name
//! the fields they care about.

use chrono::{DateTime, Utc};
use core_kernel::BillId;
use domain_billing::{Bill, BillStatus};

use crate::fixtures::{IdFixtures, TemporalFixtures};

/// Builder for constructing test bills
///
/// Every built bill gets a fresh identifier unless one is set.
pub struct BillBuilder {
    uuid: BillId,
    user_uuid: String,
    bill_status: BillStatus,
    amount: i64,
    issued_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
    deleted: bool,
}

impl Default for BillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            uuid: BillId::new(),
            user_uuid: IdFixtures::user_uuid().to_string(),
            bill_status: BillStatus::Pending,
            amount: 100,
            issued_at: TemporalFixtures::issued_at(),
            paid_at: None,
            deleted: false,
        }
    }

    pub fn with_uuid(mut self, uuid: BillId) -> Self {
        self.uuid = uuid;
        self
    }

    pub fn with_user(mut self, user_uuid: impl Into<String>) -> Self {
        self.user_uuid = user_uuid.into();
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = at;
        self
    }

    /// Sets the status without touching `paid_at`
    pub fn with_status(mut self, status: BillStatus) -> Self {
        self.bill_status = status;
        self
    }

    /// Marks the bill paid at the fixture settlement time
    pub fn paid(self) -> Self {
        self.paid_on(TemporalFixtures::paid_at())
    }

    /// Marks the bill paid at `at`
    pub fn paid_on(mut self, at: DateTime<Utc>) -> Self {
        self.bill_status = BillStatus::Paid;
        self.paid_at = Some(at);
        self
    }

    pub fn overdue(mut self) -> Self {
        self.bill_status = BillStatus::Overdue;
        self.paid_at = None;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Builds the bill
    pub fn build(self) -> Bill {
        Bill {
            uuid: self.uuid,
            user_uuid: self.user_uuid,
            bill_status: self.bill_status,
            amount: self.amount,
            issued_at: self.issued_at,
            paid_at: self.paid_at,
            deleted: self.deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let bill = BillBuilder::new().build();
        assert_eq!(bill.bill_status, BillStatus::Pending);
        assert_eq!(bill.amount, 100);
        assert!(bill.paid_at.is_none());
        assert!(!bill.deleted);
    }

    #[test]
    fn test_builder_fresh_ids() {
        assert_ne!(BillBuilder::new().build().uuid, BillBuilder::new().build().uuid);
    }

    #[test]
    fn test_paid_then_overdue_clears_paid_at() {
        let bill = BillBuilder::new().paid().overdue().build();
        assert_eq!(bill.bill_status, BillStatus::Overdue);
        assert!(bill.paid_at.is_none());
    }
}
