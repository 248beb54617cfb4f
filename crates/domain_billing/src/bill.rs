//! Bill entity and its value types
//!
//! A bill carries a whole positive amount, an owning user reference, and a
//! status. The status is the only thing that changes after creation, apart
//! from the soft-delete flag.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, CoreError};

use crate::error::BillingError;

/// Lifecycle status of a bill
///
/// Parsing is exact and case-sensitive: only `Pending`, `Paid` and `Overdue`
/// are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillStatus {
    /// Issued and awaiting payment
    Pending,
    /// Settled
    Paid,
    /// Past due and still unpaid
    Overdue,
}

impl BillStatus {
    /// Every valid status, in declaration order
    pub const ALL: [BillStatus; 3] = [BillStatus::Pending, BillStatus::Paid, BillStatus::Overdue];

    /// Returns the wire/storage name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "Pending",
            BillStatus::Paid => "Paid",
            BillStatus::Overdue => "Overdue",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, BillStatus::Paid)
    }

    /// The `paid_at` value a bill must carry after moving to this status at `at`
    pub fn settlement_time(&self, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.is_paid() {
            Some(at)
        } else {
            None
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(BillStatus::Pending),
            "Paid" => Ok(BillStatus::Paid),
            "Overdue" => Ok(BillStatus::Overdue),
            other => Err(CoreError::validation(format!("unknown bill status '{}'", other))),
        }
    }
}

/// An amount as received from a caller, before validation
///
/// Clients may send any JSON number. Whole numbers arrive as `Whole`;
/// anything with a fractional part or an exponent arrives as `Fractional`
/// and is only accepted if it still denotes a whole value (e.g. `100.0`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Whole(i64),
    Fractional(f64),
}

impl AmountInput {
    /// True for a literal zero in either representation
    pub fn is_zero(&self) -> bool {
        match self {
            AmountInput::Whole(value) => *value == 0,
            AmountInput::Fractional(value) => *value == 0.0,
        }
    }

    /// Converts to a stored amount, requiring a whole number greater than zero
    pub fn to_amount(self) -> Option<i64> {
        match self {
            AmountInput::Whole(value) if value > 0 => Some(value),
            AmountInput::Whole(_) => None,
            AmountInput::Fractional(value) => {
                if value.is_finite()
                    && value.fract() == 0.0
                    && value > 0.0
                    && value < i64::MAX as f64
                {
                    Some(value as i64)
                } else {
                    None
                }
            }
        }
    }
}

impl From<i64> for AmountInput {
    fn from(value: i64) -> Self {
        AmountInput::Whole(value)
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Fractional(value)
    }
}

/// A bill record
///
/// The store's numeric row identity is deliberately absent; `uuid` is the
/// only identity the domain and its callers know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// External identifier, unique across all bills including deleted ones
    pub uuid: BillId,
    /// Owning user reference, not checked against any user registry
    pub user_uuid: String,
    /// Current lifecycle status
    pub bill_status: BillStatus,
    /// Whole amount, always greater than zero
    pub amount: i64,
    /// Creation time
    pub issued_at: DateTime<Utc>,
    /// Time the bill last moved to `Paid`, cleared on any other status
    pub paid_at: Option<DateTime<Utc>>,
    /// Soft-delete flag
    pub deleted: bool,
}

impl Bill {
    /// Issues a new bill with a fresh identifier
    ///
    /// `paid_at` starts empty even when the initial status is `Paid`; only a
    /// status update stamps it.
    pub fn issue(user_uuid: impl Into<String>, bill_status: BillStatus, amount: i64) -> Self {
        Self {
            uuid: BillId::new(),
            user_uuid: user_uuid.into(),
            bill_status,
            amount,
            issued_at: Utc::now(),
            paid_at: None,
            deleted: false,
        }
    }

    /// Checks that the bill may be soft-deleted
    pub fn ensure_deletable(&self) -> Result<(), BillingError> {
        if self.bill_status.is_paid() {
            return Err(BillingError::failed_precondition("cannot delete a paid bill"));
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_exact() {
        assert_eq!("Paid".parse::<BillStatus>().unwrap(), BillStatus::Paid);
        assert!("paid".parse::<BillStatus>().is_err());
        assert!(" Paid".parse::<BillStatus>().is_err());
        assert!("Cancelled".parse::<BillStatus>().is_err());
    }

    #[test]
    fn test_status_display_matches_parse() {
        for status in BillStatus::ALL {
            assert_eq!(status.to_string().parse::<BillStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_amount_input_whole() {
        assert_eq!(AmountInput::Whole(100).to_amount(), Some(100));
        assert_eq!(AmountInput::Whole(0).to_amount(), None);
        assert_eq!(AmountInput::Whole(-3).to_amount(), None);
    }

    #[test]
    fn test_amount_input_fractional() {
        assert_eq!(AmountInput::Fractional(250.0).to_amount(), Some(250));
        assert_eq!(AmountInput::Fractional(10.5).to_amount(), None);
        assert_eq!(AmountInput::Fractional(-1.0).to_amount(), None);
        assert_eq!(AmountInput::Fractional(f64::INFINITY).to_amount(), None);
        assert_eq!(AmountInput::Fractional(1e30).to_amount(), None);
    }

    #[test]
    fn test_amount_input_rejects_values_past_i64() {
        // 2^63 is the nearest f64 to i64::MAX and must not saturate
        assert_eq!(AmountInput::Fractional(9_223_372_036_854_775_808.0).to_amount(), None);
        assert_eq!(
            AmountInput::Fractional(9_223_372_036_854_774_784.0).to_amount(),
            Some(9_223_372_036_854_774_784)
        );

        let past_max: AmountInput = serde_json::from_str("9223372036854775808").unwrap();
        assert_eq!(past_max.to_amount(), None);
        let rounds_to_past_max: AmountInput = serde_json::from_str("9223372036854775809").unwrap();
        assert_eq!(rounds_to_past_max.to_amount(), None);
    }

    #[test]
    fn test_amount_input_deserializes_untagged() {
        let whole: AmountInput = serde_json::from_str("100").unwrap();
        let fractional: AmountInput = serde_json::from_str("99.5").unwrap();
        assert_eq!(whole, AmountInput::Whole(100));
        assert_eq!(fractional, AmountInput::Fractional(99.5));
        assert!(serde_json::from_str::<AmountInput>("\"100\"").is_err());
    }

    #[test]
    fn test_issue_never_sets_paid_at() {
        let bill = Bill::issue("u1", BillStatus::Paid, 100);
        assert!(bill.paid_at.is_none());
        assert!(bill.is_active());
    }

    #[test]
    fn test_settlement_time_only_for_paid() {
        let now = Utc::now();
        assert_eq!(BillStatus::Paid.settlement_time(now), Some(now));
        assert_eq!(BillStatus::Pending.settlement_time(now), None);
        assert_eq!(BillStatus::Overdue.settlement_time(now), None);
    }

    #[test]
    fn test_paid_bill_is_not_deletable() {
        let mut bill = Bill::issue("u1", BillStatus::Pending, 100);
        assert!(bill.ensure_deletable().is_ok());

        bill.bill_status = BillStatus::Paid;
        assert!(matches!(
            bill.ensure_deletable(),
            Err(BillingError::FailedPrecondition(_))
        ));
    }
}
