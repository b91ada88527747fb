use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use minicrm_core::entities::campaign_logs::ListCampaignLogs;
use minicrm_core::framework::StoreError;
use minicrm_sdk::objects::{CampaignLog, ListCampaignLogsQuery};

use super::ApiError;
use crate::state::AppState;

/// `GET /logs`: list campaign log entries, oldest first.
///
/// Without a `limit` query parameter every entry is returned.
pub(super) async fn list_campaign_logs(
    State(state): State<AppState>,
    Query(query): Query<ListCampaignLogsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = state
        .campaign_logs
        .list_campaign_logs(ListCampaignLogs::from(query))
        .await
        .map_err(ApiError::Store)?;

    let logs = documents
        .into_iter()
        .map(|d| d.into_campaign_log())
        .collect::<Result<Vec<CampaignLog>, _>>()
        .map_err(|e| ApiError::Store(StoreError::from(e)))?;

    Ok(Json(logs))
}
