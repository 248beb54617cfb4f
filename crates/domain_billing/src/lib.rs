//! Billing Domain - Bill Lifecycle
//!
//! This crate owns the rules for bill records: which inputs are acceptable,
//! how a bill's status may change, and when a bill may be soft-deleted.
//!
//! # Lifecycle
//!
//! A bill is created with a caller-supplied status (`Pending`, `Paid` or
//! `Overdue`) and a positive whole amount. Its status may move freely between
//! the three values afterwards:
//!
//! - moving to `Paid` stamps `paid_at` with the transition time
//! - moving to anything else clears `paid_at`
//! - a `Paid` bill can never be deleted
//! - a deleted bill is invisible to every read and can never change again
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_billing::{AmountInput, BillLifecycleManager, CreateBillRequest, NoopNotifier};
//!
//! let manager = BillLifecycleManager::new(store, Arc::new(NoopNotifier));
//! let created = manager.create_bill(CreateBillRequest {
//!     user_uuid: Some("u1".into()),
//!     bill_status: Some("Pending".into()),
//!     amount: Some(AmountInput::Whole(100)),
//! }).await?;
//! ```

pub mod bill;
pub mod error;
pub mod ports;
pub mod service;

pub use bill::{AmountInput, Bill, BillStatus};
pub use error::{BillingError, ErrorKind};
pub use ports::{
    BillEvent, BillFilter, BillNotification, BillNotifier, BillStore, NoopNotifier,
};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{InMemoryBillStore, RecordingNotifier};
pub use service::{
    Acknowledgement, BillListOutcome, BillLifecycleManager, BillOutcome,
    CreateBillRequest, ListBillsByUserRequest, UpdateBillStatusRequest,
};
