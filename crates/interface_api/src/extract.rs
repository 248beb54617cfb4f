//! Request extractors

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON body extractor whose rejections are `INVALID_ARGUMENT` errors
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct RpcJson<T>(pub T);
