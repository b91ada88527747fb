use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::objects::{CampaignLog, DepositEvent, HealthStatus, IngestReceipt, ListCampaignLogsQuery};

/// Typed HTTP client for the Mini CRM ingestion service.
#[derive(Debug, Clone)]
pub struct CrmClient {
    http: Client,
    base_url: Url,
}

impl CrmClient {
    /// Create a new `CrmClient`.
    ///
    /// * `base_url` – root URL of the service (e.g. `http://localhost:8080`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /ingest` – record a deposit event.
    pub async fn ingest(&self, event: &DepositEvent) -> Result<IngestReceipt, ClientError> {
        let url = self.base_url.join("/ingest")?;
        let resp = self.http.post(url).json(event).send().await?;
        parse_response(resp).await
    }

    /// `GET /logs` – list campaign log entries.
    pub async fn list_campaign_logs(
        &self,
        query: &ListCampaignLogsQuery,
    ) -> Result<Vec<CampaignLog>, ClientError> {
        let url = self.base_url.join("/logs")?;
        let resp = self.http.get(url).query(query).send().await?;
        parse_response(resp).await
    }

    /// `GET /health`: liveness check.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.base_url.join("/health")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
