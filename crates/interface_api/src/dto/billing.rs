//! Billing DTOs
//!
//! Every field of a request body is optional at the JSON level. Presence and
//! value checks belong to the lifecycle manager, which reports them as
//! `INVALID_ARGUMENT` with a domain message rather than a decode error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain_billing::{
    AmountInput, Bill, BillListOutcome, BillOutcome, CreateBillRequest, ListBillsByUserRequest,
    UpdateBillStatusRequest,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillBody {
    pub user_uuid: Option<String>,
    pub bill_status: Option<String>,
    pub amount: Option<AmountInput>,
}

impl From<CreateBillBody> for CreateBillRequest {
    fn from(body: CreateBillBody) -> Self {
        CreateBillRequest {
            user_uuid: body.user_uuid,
            bill_status: body.bill_status,
            amount: body.amount,
        }
    }
}

/// Body of `GetBillById` and `DeleteBill`
#[derive(Debug, Default, Deserialize)]
pub struct BillUuidBody {
    pub uuid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillStatusBody {
    pub uuid: Option<String>,
    pub bill_status: Option<String>,
}

impl From<UpdateBillStatusBody> for UpdateBillStatusRequest {
    fn from(body: UpdateBillStatusBody) -> Self {
        UpdateBillStatusRequest {
            uuid: body.uuid,
            bill_status: body.bill_status,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBillsByUserBody {
    pub user_uuid: Option<String>,
    pub bill_status: Option<String>,
}

impl From<ListBillsByUserBody> for ListBillsByUserRequest {
    fn from(body: ListBillsByUserBody) -> Self {
        ListBillsByUserRequest {
            user_uuid: body.user_uuid,
            bill_status: body.bill_status,
        }
    }
}

/// Public fields of a bill
///
/// The row id and the deleted flag are never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    pub uuid: String,
    pub user_uuid: String,
    pub bill_status: String,
    pub amount: i64,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        Self {
            uuid: bill.uuid.to_string(),
            user_uuid: bill.user_uuid,
            bill_status: bill.bill_status.to_string(),
            amount: bill.amount,
            issued_at: bill.issued_at,
            paid_at: bill.paid_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillEnvelope {
    pub message: String,
    pub bill: BillResponse,
}

impl From<BillOutcome> for BillEnvelope {
    fn from(outcome: BillOutcome) -> Self {
        Self {
            message: outcome.message.to_string(),
            bill: outcome.bill.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillsEnvelope {
    pub message: String,
    pub bills: Vec<BillResponse>,
}

impl From<BillListOutcome> for BillsEnvelope {
    fn from(outcome: BillListOutcome) -> Self {
        Self {
            message: outcome.message.to_string(),
            bills: outcome.bills.into_iter().map(BillResponse::from).collect(),
        }
    }
}
