//! HTTP API Layer
//!
//! This crate exposes the billing service over HTTP using Axum. Each RPC
//! operation is a `POST /billing.BillingService/<Operation>` endpoint taking
//! and returning camelCase JSON.
//!
//! # Architecture
//!
//! - **Handlers**: One handler per RPC operation, plus health probes
//! - **Middleware**: Request ids, tracing, audit logging, panic capture
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: `{code, message}` error bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig};
//!
//! let app = create_router(manager, ApiConfig::default());
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod telemetry;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use axum::response::IntoResponse;
use tower::util::MapResponseLayer;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_billing::BillLifecycleManager;

use crate::config::ApiConfig;
use crate::handlers::{billing, health};
use crate::middleware::{audit_middleware, REQUEST_ID_HEADER};

/// Path prefix shared by every RPC operation
pub const RPC_PREFIX: &str = "/billing.BillingService";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub manager: BillLifecycleManager,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `manager` - Lifecycle manager wired to its store and notifier
/// * `config` - API configuration
pub fn create_router(manager: BillLifecycleManager, config: ApiConfig) -> Router {
    let state = AppState { manager, config };

    // Public routes (no auth required)
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let rpc_routes = Router::new()
        .route("/BillsCheck", post(billing::bills_check))
        .route("/CreateBill", post(billing::create_bill))
        .route("/GetBillById", post(billing::get_bill_by_id))
        .route("/UpdateBillStatus", post(billing::update_bill_status))
        .route("/DeleteBill", post(billing::delete_bill))
        .route("/ListBillsByUser", post(billing::list_bills_by_user))
        .route("/ListAllBills", post(billing::list_all_bills));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Outermost first
    let middleware = ServiceBuilder::new()
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(MapResponseLayer::new(IntoResponse::into_response))
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(CatchPanicLayer::custom(error::panic_response));

    Router::new()
        .merge(health_routes)
        .nest(RPC_PREFIX, rpc_routes)
        .layer(middleware)
        .with_state(state)
}
