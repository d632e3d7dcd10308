//! API client for communicating with the subscription portal REST API.
//!
//! This module provides the `ApiClient` struct for making API requests to
//! fetch listings, infrastructure, price summaries and member data.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{ApiResponse, Infra, Mypage, PriceSummary, SubscriptionDetail};
use crate::region::InterestRegion;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default backend location, overridable through `Config` or `CHEONGYAK_API_URL`.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum length of a subscription id accepted in a URL path.
const MAX_ID_LENGTH: usize = 64;

/// A detail page's worth of data: the listing plus its secondary lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailPage {
    pub subscription: SubscriptionDetail,
    pub infra: Option<Infra>,
    pub price_summaries: Vec<PriceSummary>,
    pub is_liked: bool,
}

/// API client for the subscription portal.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Subscription ids go into URL paths, so only plain identifiers are accepted.
    fn is_valid_subscription_id(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= MAX_ID_LENGTH
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn subscription_path(id: &str, suffix: &str) -> Result<String> {
        if !Self::is_valid_subscription_id(id) {
            return Err(ApiError::InvalidId(id.to_string()).into());
        }
        Ok(format!("/subscription/{}{}", id, suffix))
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Send a request, retrying with exponential backoff while rate limited.
    async fn send<F>(&self, method: Method, url: &str, build: F) -> Result<reqwest::Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let request = self
                .client
                .request(method.clone(), url)
                .headers(self.auth_headers()?);

            let response = build(request)
                .send()
                .await
                .with_context(|| format!("Failed to send {} request to {}", method, url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(path);
        let response = self.send(Method::GET, &url, |r| r.query(query)).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// GET an enveloped payload and unwrap its `data`.
    async fn get_data<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let envelope: ApiResponse<T> = self.get(path, query).await?;
        match envelope.data {
            Some(data) => Ok(data),
            None => Err(ApiError::InvalidResponse(format!(
                "{} returned no data{}",
                path,
                envelope
                    .message
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            ))
            .into()),
        }
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        self.send(Method::POST, &url, |r| r.json(body)).await?;
        Ok(())
    }

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
        let url = self.url(path);
        self.send(Method::DELETE, &url, |r| r.query(query)).await?;
        Ok(())
    }

    // ===== Subscriptions =====

    /// Fetch a single subscription listing
    pub async fn fetch_subscription(&self, id: &str) -> Result<SubscriptionDetail> {
        let path = Self::subscription_path(id, "")?;
        debug!(id, "Fetching subscription");
        self.get_data(&path, &[]).await
    }

    /// Fetch schools and stations near a listing
    pub async fn fetch_infra(&self, id: &str) -> Result<Infra> {
        let path = Self::subscription_path(id, "/infra")?;
        self.get_data(&path, &[]).await
    }

    /// Fetch monthly deal statistics for a region. Inputs are trimmed.
    pub async fn fetch_price_summary(
        &self,
        region: &str,
        city: &str,
        district: &str,
    ) -> Result<Vec<PriceSummary>> {
        let query = [
            ("region", region.trim()),
            ("city", city.trim()),
            ("district", district.trim()),
        ];
        let summaries: Option<Vec<PriceSummary>> =
            self.get::<ApiResponse<Vec<PriceSummary>>>("/subscription/price-summary", &query)
                .await?
                .into_data();
        Ok(summaries.unwrap_or_default())
    }

    /// Whether the logged-in member has bookmarked the listing
    pub async fn fetch_is_liked(&self, id: &str) -> Result<bool> {
        let path = Self::subscription_path(id, "/like")?;
        let envelope: ApiResponse<bool> = self.get(&path, &[]).await?;
        Ok(envelope.into_data().unwrap_or(false))
    }

    pub async fn like_subscription(&self, id: &str) -> Result<()> {
        let path = Self::subscription_path(id, "/like")?;
        self.post(&path, &serde_json::json!({})).await
    }

    pub async fn unlike_subscription(&self, id: &str) -> Result<()> {
        let path = Self::subscription_path(id, "/like")?;
        self.delete(&path, &[]).await
    }

    /// Fetch the listing, then its infra, like status and area prices concurrently.
    ///
    /// Only the listing itself is required; secondary lookups that fail are
    /// logged and left empty.
    pub async fn fetch_detail_page(&self, id: &str) -> Result<DetailPage> {
        let subscription = self.fetch_subscription(id).await?;
        let (region, city, district) = subscription.price_summary_query();

        let like_lookup = async {
            if self.has_token() {
                self.fetch_is_liked(id).await
            } else {
                Ok(false)
            }
        };

        let (infra, is_liked, prices) = futures::join!(
            self.fetch_infra(id),
            like_lookup,
            self.fetch_price_summary(&region, &city, &district),
        );

        let infra = infra
            .map_err(|e| warn!(id, error = %e, "Failed to fetch infra"))
            .ok();
        let is_liked = is_liked
            .map_err(|e| warn!(id, error = %e, "Failed to fetch like status"))
            .unwrap_or(false);
        let price_summaries = prices
            .map_err(|e| warn!(id, error = %e, "Failed to fetch price summary"))
            .unwrap_or_default();

        Ok(DetailPage {
            subscription,
            infra,
            price_summaries,
            is_liked,
        })
    }

    // ===== Member =====

    pub async fn fetch_mypage(&self) -> Result<Mypage> {
        self.get_data("/member/mypage", &[]).await
    }

    pub async fn add_interest_region(&self, region: &InterestRegion) -> Result<()> {
        let body = serde_json::json!({ "region": region.to_query() });
        self.post("/member/interest-region", &body).await
    }

    pub async fn delete_interest_region(&self, region: &InterestRegion) -> Result<()> {
        let query = region.to_query();
        self.delete("/member/interest-region", &[("region", query.as_str())])
            .await
    }

    // ===== Regions =====

    /// List of 시/도 names. This endpoint returns a bare array.
    pub async fn fetch_regions(&self) -> Result<Vec<String>> {
        self.get("/region", &[]).await
    }

    /// List of 군/구 names in a 시/도. This endpoint returns a bare array.
    pub async fn fetch_districts(&self, city: &str) -> Result<Vec<String>> {
        self.get("/region/district", &[("city", city)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_subscription_id() {
        assert!(ApiClient::is_valid_subscription_id("2025000123"));
        assert!(ApiClient::is_valid_subscription_id("APT-2025_01"));

        assert!(!ApiClient::is_valid_subscription_id(""));
        assert!(!ApiClient::is_valid_subscription_id("../member/mypage"));
        assert!(!ApiClient::is_valid_subscription_id("12 34"));
        assert!(!ApiClient::is_valid_subscription_id("123?like=1"));
        assert!(!ApiClient::is_valid_subscription_id(&"1".repeat(65)));
    }

    #[test]
    fn test_subscription_path() {
        assert_eq!(ApiClient::subscription_path("42", "").unwrap(), "/subscription/42");
        assert_eq!(ApiClient::subscription_path("42", "/infra").unwrap(), "/subscription/42/infra");
        assert!(ApiClient::subscription_path("4/2", "").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("https://api.example.com/v1/").unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/v1");
        assert_eq!(client.url("/region"), "https://api.example.com/v1/region");
        assert!(!client.has_token());
        assert!(client.with_token("abc".to_string()).has_token());
    }

    #[test]
    fn test_detail_page_cache_round_trip() {
        let page = DetailPage {
            is_liked: true,
            price_summaries: vec![PriceSummary {
                deal_year_month: Some(202501),
                deal_count: Some(3),
                price_per_ar: None,
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&page).unwrap();
        let restored: DetailPage = serde_json::from_str(&json).unwrap();
        assert!(restored.is_liked);
        assert_eq!(restored.price_summaries, page.price_summaries);
    }
}
