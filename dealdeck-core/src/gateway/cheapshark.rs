//! CheapShark backend for the deals gateway
//!
//! Plain GET requests against the public API; every failure collapses into a
//! [`TransportError`].

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::config::GatewayConfig;
use super::DealsGateway;
use crate::catalog::{DealDetail, DealRecord, GameSummary};
use crate::error::{DealsError, Result, TransportError};

/// CheapShark API client
pub struct CheapSharkGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl CheapSharkGateway {
    /// Create a gateway with the given configuration
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(seconds));
        }

        let client = builder
            .build()
            .map_err(|e| DealsError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// `GET /deals?storeID=&pageSize=`
    pub fn deals_url(&self, store_id: &str, limit: usize) -> std::result::Result<Url, TransportError> {
        self.endpoint(
            "deals",
            &[("storeID", store_id.to_string()), ("pageSize", limit.to_string())],
        )
    }

    /// `GET /games?title=&limit=`
    pub fn search_url(&self, term: &str, limit: usize) -> std::result::Result<Url, TransportError> {
        self.endpoint(
            "games",
            &[("title", term.to_string()), ("limit", limit.to_string())],
        )
    }

    /// `GET /games?id=`
    pub fn detail_url(&self, game_id: &str) -> std::result::Result<Url, TransportError> {
        self.endpoint("games", &[("id", game_id.to_string())])
    }

    fn endpoint(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> std::result::Result<Url, TransportError> {
        let base = format!("{}/{}", self.config.api_base.trim_end_matches('/'), path);
        Url::parse_with_params(&base, params)
            .map_err(|e| TransportError::new(base.as_str(), format!("invalid URL: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, TransportError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportError::new(url.as_str(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Deals API returned HTTP {} for {}", status, url);
            return Err(TransportError::new(url.as_str(), format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(url.as_str(), format!("failed to read body: {e}")))?;

        serde_json::from_str(&body).map_err(|e| {
            TransportError::new(url.as_str(), format!("unexpected response body: {e}"))
        })
    }
}

#[async_trait]
impl DealsGateway for CheapSharkGateway {
    async fn list_deals(
        &self,
        store_id: &str,
        limit: usize,
    ) -> std::result::Result<Vec<DealRecord>, TransportError> {
        let url = self.deals_url(store_id, limit)?;
        let mut deals: Vec<DealRecord> = self.get_json(url).await?;
        deals.truncate(limit);
        debug!("Fetched {} deals for store {}", deals.len(), store_id);
        Ok(deals)
    }

    async fn search_by_title(
        &self,
        term: &str,
        limit: usize,
    ) -> std::result::Result<Vec<DealRecord>, TransportError> {
        let url = self.search_url(term, limit)?;
        let hits: Vec<GameSummary> = self.get_json(url).await?;
        debug!("Search '{}' matched {} games", term, hits.len());
        Ok(hits.into_iter().take(limit).map(DealRecord::from).collect())
    }

    async fn get_detail(&self, game_id: &str) -> std::result::Result<DealDetail, TransportError> {
        let url = self.detail_url(game_id)?;
        self.get_json(url).await
    }

    fn name(&self) -> &'static str {
        "cheapshark"
    }
}
