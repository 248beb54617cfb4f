//! Bill Lifecycle Manager
//!
//! The manager is the only place business rules are enforced. Each
//! operation validates its input before touching the store and returns
//! either a success payload or a classified [`BillingError`].
//!
//! Store faults are never passed through: [`internal`] logs the underlying
//! [`PortError`] and replaces it with a generic `Internal` error.
//!
//! Notifications are dispatched on a spawned task once the write has been
//! committed, so a slow or unreachable queue never delays the response.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use core_kernel::{BillId, HealthCheckResult, PortError};

use crate::bill::{AmountInput, Bill, BillStatus};
use crate::error::BillingError;
use crate::ports::{BillEvent, BillFilter, BillNotification, BillNotifier, BillStore};

pub const HEALTH_MESSAGE: &str = "Billing service is up and running";
pub const BILL_CREATED: &str = "Bill created successfully";
pub const BILL_FOUND: &str = "Bill found";
pub const BILL_STATUS_UPDATED: &str = "Bill status updated successfully";
pub const BILL_DELETED: &str = "Bill deleted successfully";
pub const BILLS_FOUND: &str = "Bills found";

/// Upper bound on a single notification dispatch
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

const MISSING_CREATE_FIELDS: &str = "missing required fields to create the bill";
const MISSING_UPDATE_FIELDS: &str = "missing required fields to update the bill status";
const MISSING_USER: &str = "missing required field userUuid";
const INVALID_AMOUNT: &str = "amount must be a whole number greater than 0";
const INVALID_STATUS: &str = "invalid status, must be 'Pending', 'Paid' or 'Overdue'";
const BILL_NOT_FOUND: &str = "bill not found";
const NO_BILLS_FOR_USER: &str = "no bills found for the given user";
const NO_BILLS: &str = "no bills found";
const BILL_CHANGED: &str = "bill changed while being deleted, retry the request";
const INTERNAL_FAILURE: &str = "internal error while processing the bill request";

/// Input of `CreateBill`, exactly as received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateBillRequest {
    pub user_uuid: Option<String>,
    pub bill_status: Option<String>,
    pub amount: Option<AmountInput>,
}

/// Input of `UpdateBillStatus`, exactly as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBillStatusRequest {
    pub uuid: Option<String>,
    pub bill_status: Option<String>,
}

/// Input of `ListBillsByUser`, exactly as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBillsByUserRequest {
    pub user_uuid: Option<String>,
    pub bill_status: Option<String>,
}

/// Success payload carrying one bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillOutcome {
    pub message: &'static str,
    pub bill: Bill,
}

/// Success payload carrying a list of bills
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillListOutcome {
    pub message: &'static str,
    pub bills: Vec<Bill>,
}

/// Success payload with no body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgement {
    pub message: &'static str,
}

/// Enforces the bill lifecycle rules over an injected store and notifier
#[derive(Clone)]
pub struct BillLifecycleManager {
    store: Arc<dyn BillStore>,
    notifier: Arc<dyn BillNotifier>,
}

impl BillLifecycleManager {
    /// Creates a manager over the given store and notifier
    pub fn new(store: Arc<dyn BillStore>, notifier: Arc<dyn BillNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Static availability check
    pub fn health_check(&self) -> Acknowledgement {
        Acknowledgement {
            message: HEALTH_MESSAGE,
        }
    }

    /// Reports whether the underlying store can serve requests
    pub async fn store_health(&self) -> HealthCheckResult {
        self.store.health_check().await
    }

    /// Creates a bill
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` - a field is missing/empty/zero, the amount is not
    ///   a whole number above zero, or the status is not one of the three
    ///   known values (checked in that order)
    /// * `Internal` - the store failed
    #[instrument(skip(self, request))]
    pub async fn create_bill(&self, request: CreateBillRequest) -> Result<BillOutcome, BillingError> {
        let user_uuid = non_empty(request.user_uuid.as_deref());
        let status = non_empty(request.bill_status.as_deref());
        let amount = request.amount.filter(|a| !a.is_zero());

        let (user_uuid, status, amount) = match (user_uuid, status, amount) {
            (Some(u), Some(s), Some(a)) => (u, s, a),
            _ => return Err(rejected(MISSING_CREATE_FIELDS)),
        };
        let amount = amount.to_amount().ok_or_else(|| rejected(INVALID_AMOUNT))?;
        let status = parse_status(status)?;

        let bill = Bill::issue(user_uuid, status, amount);
        let stored = self
            .store
            .insert(&bill)
            .await
            .map_err(internal("create_bill"))?;

        info!(bill_uuid = %stored.uuid, user_uuid = %stored.user_uuid, status = %stored.bill_status, "Bill created");
        self.dispatch(BillEvent::Created, &stored);

        Ok(BillOutcome {
            message: BILL_CREATED,
            bill: stored,
        })
    }

    /// Fetches a non-deleted bill by its external uuid
    ///
    /// A missing or malformed uuid is indistinguishable from an unknown one.
    #[instrument(skip(self))]
    pub async fn get_bill_by_id(&self, uuid: Option<&str>) -> Result<BillOutcome, BillingError> {
        let id = parse_bill_id(uuid).ok_or_else(|| BillingError::not_found(BILL_NOT_FOUND))?;

        let bill = self
            .store
            .find_active(id)
            .await
            .map_err(internal("get_bill_by_id"))?
            .ok_or_else(|| BillingError::not_found(BILL_NOT_FOUND))?;

        Ok(BillOutcome {
            message: BILL_FOUND,
            bill,
        })
    }

    /// Changes the status of a non-deleted bill
    ///
    /// Moving to `Paid` stamps `paid_at` with the current time; moving to
    /// any other status clears it. The write is a single conditional update
    /// so a bill deleted concurrently is reported as `NotFound`.
    #[instrument(skip(self, request))]
    pub async fn update_bill_status(
        &self,
        request: UpdateBillStatusRequest,
    ) -> Result<BillOutcome, BillingError> {
        let raw_uuid = non_empty(request.uuid.as_deref());
        let status = non_empty(request.bill_status.as_deref());

        let (raw_uuid, status) = match (raw_uuid, status) {
            (Some(u), Some(s)) => (u, s),
            _ => return Err(rejected(MISSING_UPDATE_FIELDS)),
        };
        let status = parse_status(status)?;
        let id = parse_bill_id(Some(raw_uuid)).ok_or_else(|| BillingError::not_found(BILL_NOT_FOUND))?;

        let paid_at = status.settlement_time(Utc::now());
        let updated = self
            .store
            .update_status(id, status, paid_at)
            .await
            .map_err(internal("update_bill_status"))?
            .ok_or_else(|| BillingError::not_found(BILL_NOT_FOUND))?;

        info!(bill_uuid = %updated.uuid, status = %updated.bill_status, "Bill status updated");
        self.dispatch(BillEvent::StatusUpdated, &updated);

        Ok(BillOutcome {
            message: BILL_STATUS_UPDATED,
            bill: updated,
        })
    }

    /// Soft-deletes a non-deleted, unpaid bill
    ///
    /// # Errors
    ///
    /// * `NotFound` - no non-deleted bill with this uuid
    /// * `FailedPrecondition` - the bill is `Paid`; nothing is written
    /// * `Internal` - the store failed
    #[instrument(skip(self))]
    pub async fn delete_bill(&self, uuid: Option<&str>) -> Result<Acknowledgement, BillingError> {
        let id = parse_bill_id(uuid).ok_or_else(|| BillingError::not_found(BILL_NOT_FOUND))?;

        let bill = self
            .store
            .find_active(id)
            .await
            .map_err(internal("delete_bill"))?
            .ok_or_else(|| BillingError::not_found(BILL_NOT_FOUND))?;
        bill.ensure_deletable()?;

        let deleted = self
            .store
            .soft_delete(id)
            .await
            .map_err(internal("delete_bill"))?;

        if !deleted {
            // Lost a race between the read and the conditional write.
            let current = self
                .store
                .find_active(id)
                .await
                .map_err(internal("delete_bill"))?
                .ok_or_else(|| BillingError::not_found(BILL_NOT_FOUND))?;
            current.ensure_deletable()?;
            return Err(BillingError::failed_precondition(BILL_CHANGED));
        }

        info!(bill_uuid = %id, "Bill soft-deleted");
        Ok(Acknowledgement {
            message: BILL_DELETED,
        })
    }

    /// Lists a user's non-deleted bills, optionally narrowed to one status
    ///
    /// An empty status string counts as no status filter.
    #[instrument(skip(self, request))]
    pub async fn list_bills_by_user(
        &self,
        request: ListBillsByUserRequest,
    ) -> Result<BillListOutcome, BillingError> {
        let user_uuid = non_empty(request.user_uuid.as_deref()).ok_or_else(|| rejected(MISSING_USER))?;
        let status = non_empty(request.bill_status.as_deref())
            .map(parse_status)
            .transpose()?;

        let filter = BillFilter::for_user(user_uuid).with_status(status);
        let bills = self
            .store
            .find_active_many(&filter)
            .await
            .map_err(internal("list_bills_by_user"))?;

        if bills.is_empty() {
            return Err(BillingError::not_found(NO_BILLS_FOR_USER));
        }

        debug!(user_uuid, count = bills.len(), "Listed bills for user");
        Ok(BillListOutcome {
            message: BILLS_FOUND,
            bills,
        })
    }

    /// Lists every non-deleted bill
    #[instrument(skip(self))]
    pub async fn list_all_bills(&self) -> Result<BillListOutcome, BillingError> {
        let bills = self
            .store
            .find_active_many(&BillFilter::all())
            .await
            .map_err(internal("list_all_bills"))?;

        if bills.is_empty() {
            return Err(BillingError::not_found(NO_BILLS));
        }

        Ok(BillListOutcome {
            message: BILLS_FOUND,
            bills,
        })
    }

    /// Hands the notification to a background task and returns immediately
    fn dispatch(&self, event: BillEvent, bill: &Bill) {
        let notifier = Arc::clone(&self.notifier);
        let notification = BillNotification::new(event, bill.clone());

        tokio::spawn(async move {
            let bill_uuid = notification.bill.uuid;
            match tokio::time::timeout(NOTIFY_TIMEOUT, notifier.notify(&notification)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(%bill_uuid, event = ?event, error = %e, "Failed to enqueue bill notification");
                }
                Err(_) => {
                    warn!(
                        %bill_uuid,
                        event = ?event,
                        timeout_ms = NOTIFY_TIMEOUT.as_millis() as u64,
                        "Bill notification timed out"
                    );
                }
            }
        });
    }
}

/// Converts a store fault into the generic `Internal` error, logging the cause
fn internal(operation: &'static str) -> impl FnOnce(PortError) -> BillingError {
    move |e| {
        error!(operation, error = %e, "Bill store operation failed");
        BillingError::internal(INTERNAL_FAILURE)
    }
}

fn rejected(message: &str) -> BillingError {
    debug!(reason = message, "Rejected bill request");
    BillingError::invalid_argument(message)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_status(raw: &str) -> Result<BillStatus, BillingError> {
    raw.parse::<BillStatus>().map_err(|_| rejected(INVALID_STATUS))
}

fn parse_bill_id(raw: Option<&str>) -> Option<BillId> {
    non_empty(raw).and_then(|s| BillId::parse_exact(s).ok())
}
