//! Axum server setup and router configuration.

use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use minicrm_core::framework::StoreError;
use minicrm_sdk::objects::{HealthStatus, ReadyStatus};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::{error::Elapsed, timeout};

/// Upper bound on each store ping in `/ready`.
const READY_PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(crate::api::router())
        // Health check endpoints
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        // Browser dashboards call the API cross-origin
        .layer(middleware::from_fn(allow_any_origin))
        // Add state to all routes
        .with_state(state)
}

/// Adds `Access-Control-Allow-Origin: *` to every response and answers
/// CORS preflight requests directly.
async fn allow_any_origin(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        let mut preflight = StatusCode::NO_CONTENT.into_response();
        let headers = preflight.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        );
        preflight
    } else {
        next.run(req).await
    };
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Ready check - pings both stores.
async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let (analytics, campaign_logs) = tokio::join!(
        timeout(READY_PING_TIMEOUT, state.analytics.ping()),
        timeout(READY_PING_TIMEOUT, state.campaign_logs.ping()),
    );

    let describe = |name: &str, result: Result<Result<(), StoreError>, Elapsed>| match result {
        Ok(Ok(())) => "up",
        Ok(Err(e)) => {
            tracing::warn!(store = name, error = %e, "Readiness check failed");
            "down"
        }
        Err(_) => {
            tracing::warn!(store = name, timeout = ?READY_PING_TIMEOUT, "Readiness check timed out");
            "down"
        }
    };
    let analytics = describe("analytics", analytics);
    let campaign_logs = describe("campaign_logs", campaign_logs);

    let ready = analytics == "up" && campaign_logs == "up";
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadyStatus {
            status: if ready { "ready" } else { "degraded" }.to_string(),
            analytics: analytics.to_string(),
            campaign_logs: campaign_logs.to_string(),
        }),
    )
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    serve(listener, router, shutdown_signal()).await
}

/// Serve `router` on an already bound listener until `shutdown` completes.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use minicrm_core::config::{CampaignRules, ConfigStore};
    use minicrm_core::stores::memory::{MemoryAnalyticsStore, MemoryCampaignLogStore};
    use minicrm_sdk::objects::{CampaignAction, CampaignDecision, CampaignLog, IngestReceipt};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        analytics: Arc<MemoryAnalyticsStore>,
        campaign_logs: Arc<MemoryCampaignLogStore>,
    }

    fn test_app() -> TestApp {
        let analytics = Arc::new(MemoryAnalyticsStore::new());
        let campaign_logs = Arc::new(MemoryCampaignLogStore::new());
        let state = AppState::new(
            analytics.clone(),
            campaign_logs.clone(),
            ConfigStore::new(CampaignRules::default()),
        );
        TestApp {
            router: build_router(state),
            analytics,
            campaign_logs,
        }
    }

    fn post_json(uri: &str, body: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(router: &Router, request: axum::http::Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_ingest_below_threshold_is_accepted_without_campaign_log() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            post_json("/ingest", r#"{"player_id":"p-1","amount":500}"#),
        )
        .await;

        assert_eq!(status, StatusCode::ACCEPTED);
        let receipt: IngestReceipt = serde_json::from_slice(&body).unwrap();
        assert!(receipt.analytics_recorded);
        assert_eq!(receipt.campaign, CampaignDecision::NotEligible);

        let rows = app.analytics.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_id, receipt.event_id);
        assert!(app.campaign_logs.logs().await.is_empty());
    }

    #[tokio::test]
    async fn test_ingest_at_threshold_shows_up_in_logs() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            post_json("/ingest", r#"{"player_id":"whale","amount":1000}"#),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let receipt: IngestReceipt = serde_json::from_slice(&body).unwrap();
        assert_eq!(receipt.campaign, CampaignDecision::Logged);

        let (status, body) = send(&app.router, get("/logs")).await;
        assert_eq!(status, StatusCode::OK);
        let logs: Vec<CampaignLog> = serde_json::from_slice(&body).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].event_id, receipt.event_id.to_string());
        assert_eq!(logs[0].player_id, "whale");
        assert_eq!(logs[0].action, CampaignAction::BonusMessage);
        assert_eq!(logs[0].amount, 1000.0);
        assert_eq!(logs[0].timestamp, receipt.timestamp);
    }

    #[tokio::test]
    async fn test_logs_filter_and_limit() {
        let app = test_app();
        for (player, amount) in [("a", 1500), ("b", 2000), ("a", 3000), ("a", 10)] {
            let body = format!(r#"{{"player_id":"{player}","amount":{amount}}}"#);
            let (status, _) = send(&app.router, post_json("/ingest", &body)).await;
            assert_eq!(status, StatusCode::ACCEPTED);
        }

        let (_, body) = send(&app.router, get("/logs")).await;
        let all: Vec<CampaignLog> = serde_json::from_slice(&body).unwrap();
        assert_eq!(all.len(), 3);

        let (_, body) = send(&app.router, get("/logs?player_id=a")).await;
        let only_a: Vec<CampaignLog> = serde_json::from_slice(&body).unwrap();
        assert_eq!(only_a.len(), 2);
        assert!(only_a.iter().all(|l| l.player_id == "a"));

        let (_, body) = send(&app.router, get("/logs?player_id=a&limit=1&offset=1")).await;
        let page: Vec<CampaignLog> = serde_json::from_slice(&body).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].amount, 3000.0);
    }

    #[tokio::test]
    async fn test_empty_logs_is_an_empty_array() {
        let app = test_app();
        let (status, body) = send(&app.router, get("/logs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_invalid_events_are_rejected() {
        let app = test_app();

        let (status, _) = send(&app.router, post_json("/ingest", "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app.router, post_json("/ingest", r#"{"amount":10}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &app.router,
            post_json("/ingest", r#"{"player_id":"","amount":10}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, b"player_id must not be empty");

        let (status, _) = send(
            &app.router,
            post_json("/ingest", r#"{"player_id":"p","amount":-5}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        assert!(app.analytics.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_ingest_reports_store_failures_in_receipt() {
        let app = test_app();
        app.analytics.set_unavailable(true);
        app.campaign_logs.set_unavailable(true);

        let (status, body) = send(
            &app.router,
            post_json("/ingest", r#"{"player_id":"p","amount":5000}"#),
        )
        .await;

        assert_eq!(status, StatusCode::ACCEPTED);
        let receipt: IngestReceipt = serde_json::from_slice(&body).unwrap();
        assert!(!receipt.analytics_recorded);
        assert_eq!(receipt.campaign, CampaignDecision::Failed);
    }

    #[tokio::test]
    async fn test_logs_store_failure_is_internal_error() {
        let app = test_app();
        app.campaign_logs.set_unavailable(true);

        let (status, body) = send(&app.router, get("/logs")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"internal server error");
    }

    #[tokio::test]
    async fn test_responses_allow_any_origin() {
        let app = test_app();

        let response = app.router.clone().oneshot(get("/logs")).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );

        let preflight = axum::http::Request::builder()
            .method("OPTIONS")
            .uri("/ingest")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(preflight).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let app = test_app();

        let (status, body) = send(&app.router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let health: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], "healthy");

        let (status, body) = send(&app.router, get("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        let ready: ReadyStatus = serde_json::from_slice(&body).unwrap();
        assert_eq!(ready.status, "ready");

        app.analytics.set_unavailable(true);
        let (status, body) = send(&app.router, get("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let ready: ReadyStatus = serde_json::from_slice(&body).unwrap();
        assert_eq!(ready.analytics, "down");
        assert_eq!(ready.campaign_logs, "up");
    }

    #[tokio::test]
    async fn test_padded_player_id_is_stored_trimmed() {
        let app = test_app();
        let (status, _) = send(
            &app.router,
            post_json("/ingest", r#"{"player_id":"  vip-1 ","amount":1500}"#),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(app.analytics.rows().await[0].player_id, "vip-1");

        let (_, body) = send(&app.router, get("/logs?player_id=vip-1")).await;
        let logs: Vec<CampaignLog> = serde_json::from_slice(&body).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].player_id, "vip-1");

        let (_, body) = send(&app.router, get("/logs?player_id=%20%20")).await;
        let logs: Vec<CampaignLog> = serde_json::from_slice(&body).unwrap();
        assert_eq!(logs.len(), 1);
    }

    /// Analytics store whose ping never completes.
    struct StalledAnalytics;

    #[async_trait::async_trait]
    impl minicrm_core::framework::AnalyticsStore for StalledAnalytics {
        async fn insert_deposit_event(
            &self,
            _row: minicrm_core::entities::deposit_events::DepositEventRow,
        ) -> Result<(), StoreError> {
            Ok(())
        }

        async fn ensure_schema(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn ping(&self) -> Result<(), StoreError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_ready_times_out_on_stalled_store() {
        let state = AppState::new(
            Arc::new(StalledAnalytics),
            Arc::new(MemoryCampaignLogStore::new()),
            ConfigStore::new(CampaignRules::default()),
        );
        let router = build_router(state);

        let started = std::time::Instant::now();
        let (status, body) = send(&router, get("/ready")).await;
        assert!(started.elapsed() < READY_PING_TIMEOUT * 5);

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let ready: ReadyStatus = serde_json::from_slice(&body).unwrap();
        assert_eq!(ready.analytics, "down");
        assert_eq!(ready.campaign_logs, "up");
    }

    #[tokio::test]
    async fn test_sdk_client_round_trip() {
        use minicrm_sdk::client::{ClientError, CrmClient};
        use minicrm_sdk::objects::{DepositEvent, ListCampaignLogsQuery};

        let app = test_app();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, app.router.clone(), async move {
            let _ = stop_rx.await;
        }));

        let client = CrmClient::new(format!("http://{addr}").parse().unwrap());

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "healthy");

        let receipt = client
            .ingest(&DepositEvent::new("p-e2e", 1200.0))
            .await
            .unwrap();
        assert_eq!(receipt.campaign, CampaignDecision::Logged);
        client
            .ingest(&DepositEvent::new("p-other", 2400.0))
            .await
            .unwrap();

        let logs = client
            .list_campaign_logs(&ListCampaignLogsQuery {
                player_id: Some("p-e2e".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].event_id, receipt.event_id.to_string());

        let err = client
            .ingest(&DepositEvent::new("", 1.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { status, .. } if status == StatusCode::UNPROCESSABLE_ENTITY
        ));

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
