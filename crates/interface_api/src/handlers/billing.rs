//! Billing RPC handlers
//!
//! One handler per operation of `billing.BillingService`. Handlers only
//! translate between DTOs and the lifecycle manager.

use axum::{extract::State, Json};

use crate::dto::billing::*;
use crate::extract::RpcJson;
use crate::{error::ApiError, AppState};

/// `BillsCheck`
pub async fn bills_check(State(state): State<AppState>) -> Json<MessageResponse> {
    Json(MessageResponse::new(state.manager.health_check().message))
}

/// `CreateBill`
pub async fn create_bill(
    State(state): State<AppState>,
    RpcJson(body): RpcJson<CreateBillBody>,
) -> Result<Json<BillEnvelope>, ApiError> {
    let outcome = state.manager.create_bill(body.into()).await?;
    Ok(Json(outcome.into()))
}

/// `GetBillById`
pub async fn get_bill_by_id(
    State(state): State<AppState>,
    RpcJson(body): RpcJson<BillUuidBody>,
) -> Result<Json<BillEnvelope>, ApiError> {
    let outcome = state.manager.get_bill_by_id(body.uuid.as_deref()).await?;
    Ok(Json(outcome.into()))
}

/// `UpdateBillStatus`
pub async fn update_bill_status(
    State(state): State<AppState>,
    RpcJson(body): RpcJson<UpdateBillStatusBody>,
) -> Result<Json<BillEnvelope>, ApiError> {
    let outcome = state.manager.update_bill_status(body.into()).await?;
    Ok(Json(outcome.into()))
}

/// `DeleteBill`
pub async fn delete_bill(
    State(state): State<AppState>,
    RpcJson(body): RpcJson<BillUuidBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    let ack = state.manager.delete_bill(body.uuid.as_deref()).await?;
    Ok(Json(MessageResponse::new(ack.message)))
}

/// `ListBillsByUser`
pub async fn list_bills_by_user(
    State(state): State<AppState>,
    RpcJson(body): RpcJson<ListBillsByUserBody>,
) -> Result<Json<BillsEnvelope>, ApiError> {
    let outcome = state.manager.list_bills_by_user(body.into()).await?;
    Ok(Json(outcome.into()))
}

/// `ListAllBills`
pub async fn list_all_bills(
    State(state): State<AppState>,
) -> Result<Json<BillsEnvelope>, ApiError> {
    let outcome = state.manager.list_all_bills().await?;
    Ok(Json(outcome.into()))
}
