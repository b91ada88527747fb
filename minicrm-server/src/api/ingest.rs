use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use kanau::processor::Processor;
use minicrm_core::processors::RecordDeposit;
use minicrm_sdk::objects::{DepositEvent, IngestReceipt};

use super::ApiError;
use crate::state::AppState;

/// `POST /ingest`: record a deposit event.
///
/// Writes the event to the analytical store and, if the amount reaches the
/// bonus threshold, a campaign log entry. Store failures are reported in the
/// receipt rather than failing the request.
pub(super) async fn ingest(
    State(state): State<AppState>,
    Json(event): Json<DepositEvent>,
) -> Result<impl IntoResponse, ApiError> {
    event.validate().map_err(ApiError::Validation)?;

    let outcome = state
        .ingestor
        .process(RecordDeposit::from(event))
        .await
        .unwrap_or_else(|never| match never {});

    tracing::info!(
        event_id = %outcome.event_id,
        analytics_recorded = outcome.analytics_recorded,
        campaign = ?outcome.campaign,
        "Deposit ingested"
    );

    Ok((StatusCode::ACCEPTED, Json(IngestReceipt::from(outcome))))
}
