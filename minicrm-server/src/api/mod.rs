//! Public API handlers.
//!
//! No authentication: the service is meant to sit behind a trusted network
//! boundary.
//!
//! # Endpoints
//!
//! - `POST /ingest` – record a deposit event
//! - `GET  /logs`   – list campaign log entries

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use minicrm_core::framework::StoreError;
use minicrm_sdk::objects::DepositValidationError;

use crate::state::AppState;

mod campaign_logs;
mod ingest;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ingest", post(ingest::ingest))
        .route("/logs", get(campaign_logs::list_campaign_logs))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in API handlers.
#[derive(Debug)]
enum ApiError {
    /// The deposit event failed validation.
    Validation(DepositValidationError),
    /// A store query failed.
    Store(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Validation(e) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "API store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
