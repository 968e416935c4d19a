use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::source::{DashboardSource, PageSource};
use crate::config::{paths, Config};
use crate::error::{AppError, Result};
use crate::types::{
    BonusRow, BonusStatus, ChartSeries, DashboardStats, DateRange, PageRequest, PageResult,
    UserBonusesResponse,
};

/// Thin reqwest wrapper over the admin REST API.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(http, cfg.api_url.clone()))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "GET");
        let resp = self.http.get(&url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Status { status: status.as_u16(), url });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T> {
        let bytes = self.get(path, query).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn user_bonuses(&self, request: &PageRequest) -> Result<PageResult<BonusRow>> {
        let resp: UserBonusesResponse =
            self.get_json(paths::USER_BONUSES, &request.query_pairs()).await?;

        let mut rows = resp.bonuses;
        for row in &mut rows {
            if row.clamp_wager() {
                warn!(bonus_id = %row.id, "wager_remaining outside 0..=wager_required, clamped");
            }
            if row.status == BonusStatus::Unknown {
                debug!(bonus_id = %row.id, "unrecognised bonus status");
            }
        }
        Ok(PageResult::new(rows, resp.pages))
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        self.get_json(paths::STATS, &[]).await
    }

    pub async fn chart(&self, range: DateRange) -> Result<ChartSeries> {
        self.get_json(paths::CHARTS, &[range_param(range)]).await
    }

    pub async fn export(&self, range: DateRange) -> Result<Vec<u8>> {
        let bytes = self.get(paths::EXPORT, &[range_param(range)]).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

fn range_param(range: DateRange) -> (String, String) {
    ("range".to_string(), range.as_str().to_string())
}

#[async_trait]
impl PageSource<BonusRow> for AdminClient {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResult<BonusRow>> {
        self.user_bonuses(&request).await
    }
}

#[async_trait]
impl DashboardSource for AdminClient {
    async fn stats(&self) -> Result<DashboardStats> {
        AdminClient::stats(self).await
    }

    async fn chart(&self, range: DateRange) -> Result<ChartSeries> {
        AdminClient::chart(self, range).await
    }

    async fn export(&self, range: DateRange) -> Result<Vec<u8>> {
        AdminClient::export(self, range).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use axum::{
        extract::Query,
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::error::FetchErrorKind;

    async fn spawn_backend(app: Router) -> AdminClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        AdminClient::with_client(reqwest::Client::new(), format!("http://{addr}"))
    }

    async fn user_bonuses(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        let page = q.get("page").cloned().unwrap_or_default();
        let limit = q.get("limit").cloned().unwrap_or_default();
        let status = q.get("status").cloned().unwrap_or_else(|| "active".to_string());
        Json(json!({
            "bonuses": [{
                "id": format!("p{page}-l{limit}"),
                "userDisplayName": "alice",
                "userEmail": "alice@example.com",
                "promotionTitle": "Reload",
                "amountCents": 1000,
                "wagerRequired": 100,
                "wagerRemaining": 250,
                "status": status,
                "expiresAt": "2026-12-31T23:59:59Z"
            }],
            "pages": 0
        }))
    }

    fn request(page: u32) -> PageRequest {
        PageRequest { page_number: page, page_size: 25, filters: BTreeMap::new() }
    }

    #[tokio::test]
    async fn user_bonuses_sends_page_and_limit() {
        let client = spawn_backend(
            Router::new().route("/api/admin/promotions/user-bonuses", get(user_bonuses)),
        )
        .await;

        let page = client.user_bonuses(&request(3)).await.unwrap();
        assert_eq!(page.items[0].id, "p3-l25");
        // pages: 0 normalised to one page
        assert_eq!(page.total_pages, 1);
        // out-of-range remaining clamped at decode time
        assert_eq!(page.items[0].wager_remaining, 100);
    }

    #[tokio::test]
    async fn filters_are_forwarded_as_query_params() {
        let client = spawn_backend(
            Router::new().route("/api/admin/promotions/user-bonuses", get(user_bonuses)),
        )
        .await;

        let mut req = request(1);
        req.filters.insert("status".to_string(), "expired".to_string());
        let page = client.fetch_page(req).await.unwrap();
        assert_eq!(page.items[0].status, BonusStatus::Expired);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let client = spawn_backend(Router::new().route(
            "/api/admin/stats",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        ))
        .await;

        let err = client.stats().await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Status(503));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let client = spawn_backend(
            Router::new().route("/api/admin/charts", get(|| async { "not json" })),
        )
        .await;

        let err = client.chart(DateRange::Month).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Decode);
    }

    #[tokio::test]
    async fn stats_chart_and_export_decode() {
        let app = Router::new()
            .route(
                "/api/admin/stats",
                get(|| async {
                    Json(json!({
                        "ggr": {"value": 1250000.0, "percentage": 4.2},
                        "rtp": {"value": 96.1, "percentage": -0.3},
                        "dau": {"value": 1840.0, "percentage": 12.0},
                        "totalBets": {"value": 9800000.0, "percentage": 1.5}
                    }))
                }),
            )
            .route(
                "/api/admin/charts",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let range = q.get("range").cloned().unwrap_or_default();
                    Json(json!({"labels": [range], "revenue": [10.0], "expenses": [4.0]}))
                }),
            )
            .route(
                "/api/admin/export",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    format!("range,{}\n", q.get("range").cloned().unwrap_or_default())
                }),
            );
        let client = spawn_backend(app).await;

        let stats = client.stats().await.unwrap();
        assert_eq!(stats.dau.value, 1840.0);
        assert_eq!(stats.total_bets.percentage, 1.5);

        let chart = client.chart(DateRange::Year).await.unwrap();
        assert_eq!(chart.labels, vec!["year".to_string()]);

        let bytes = client.export(DateRange::Week).await.unwrap();
        assert_eq!(bytes, b"range,week\n");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = AdminClient::with_client(reqwest::Client::new(), format!("http://{addr}"));

        let err = client.stats().await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Network);
    }
}
