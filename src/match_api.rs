//! Client side of the downstream offer-matching service.
//!
//! The service is opaque: one extracted context goes out as JSON, a list of
//! offers grouped by match comes back. Responses are read leniently since
//! every field may be missing.

use crate::config::ApiConfig;
use crate::error::{ContextError, Result};
use crate::metrics::{
    ExtractionMetrics, MATCH_OUTCOME_API_ERROR, MATCH_OUTCOME_OK, MATCH_OUTCOME_TRANSPORT_ERROR,
};
use crate::text::clean_opt;
use crate::types::EventContext;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("ticket_context/", env!("CARGO_PKG_VERSION"));

/// Body POSTed to `<api_base>/match`. Blank values are sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub performer_query: Option<String>,
    pub raw_title: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub date_day: Option<String>,
    pub time_24: Option<String>,
    pub page_url: Option<String>,
}

impl MatchRequest {
    pub fn from_context(context: &EventContext, page_url: Option<&str>) -> Self {
        Self {
            performer_query: clean_opt(context.performer_query.as_deref()),
            raw_title: clean_opt(context.raw_title.as_deref()),
            city: clean_opt(context.city.as_deref()),
            state: clean_opt(context.state.as_deref()),
            date_day: clean_opt(context.date_day.as_deref()),
            time_24: clean_opt(context.time_24.as_deref()),
            page_url: page_url
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub matches: Vec<MatchEntry>,
    /// Opaque; the service has sent both numbers and labels here.
    #[serde(default)]
    pub confidence: Option<Value>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl MatchResponse {
    pub fn offers(&self) -> impl Iterator<Item = &Offer> {
        self.matches.iter().flat_map(|m| m.offers.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    #[serde(default)]
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub base_price_min: Option<f64>,
    #[serde(default)]
    pub est_after_promo: Option<f64>,
    #[serde(default)]
    pub promo_percent: Option<f64>,
    #[serde(default)]
    pub promo_code: Option<String>,
}

pub struct MatchClient {
    http_client: reqwest::Client,
    match_url: String,
}

impl MatchClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;
        Self::with_http_client(http_client, config)
    }

    /// Use a preconfigured `reqwest` client (proxies, TLS roots, ...).
    pub fn with_http_client(http_client: reqwest::Client, config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            http_client,
            match_url: config.match_url()?,
        })
    }

    pub fn match_url(&self) -> &str {
        &self.match_url
    }

    /// POST the request and decode the offers. Non-2xx statuses become
    /// [`ContextError::Api`] carrying the response body.
    pub async fn find_matches(&self, request: &MatchRequest) -> Result<MatchResponse> {
        debug!(url = %self.match_url, performer = ?request.performer_query, "Querying match API");

        let response = match self.http_client.post(&self.match_url).json(request).send().await {
            Ok(r) => r,
            Err(e) => {
                ExtractionMetrics::record_match_request(MATCH_OUTCOME_TRANSPORT_ERROR);
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Match API returned an error");
            ExtractionMetrics::record_match_request(MATCH_OUTCOME_API_ERROR);
            return Err(ContextError::Api {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: MatchResponse = serde_json::from_str(&body)?;
        ExtractionMetrics::record_match_request(MATCH_OUTCOME_OK);
        debug!(offers = parsed.offers().count(), "Match API answered");
        Ok(parsed)
    }
}
